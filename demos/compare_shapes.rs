/**
 * Example: Compare the built-in dot shapes
 *
 * This example generates the same screen geometry with each of the nine
 * dot shapes and saves a threshold tile preview for each, so the growth
 * patterns can be compared side by side.
 *
 * Run with:
 *   cargo run --example compare_shapes
 */

use halftone_screen::{generate_thresholds, save_thresholds_to_png, DotShape, ScreenParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Dot Shape Comparison\n");
    println!("{:<12} {:<10} {}", "Shape", "Tile", "Output File");
    println!("{}", "-".repeat(50));

    let shapes = [
        ("round", DotShape::Round),
        ("ellipse", DotShape::Ellipse),
        ("inverted", DotShape::Inverted),
        ("rhomboid", DotShape::Rhomboid),
        ("line-x", DotShape::LineX),
        ("line-y", DotShape::LineY),
        ("diamond", DotShape::Diamond),
        ("square", DotShape::Square),
        ("redbook", DotShape::RedBook),
    ];

    for (name, shape) in shapes {
        let params = ScreenParams {
            angle: 45.0,
            frequency: 53.0,
            dot_shape: shape,
            ..Default::default()
        };

        let thresh = generate_thresholds(&params)?;
        let filename = format!("example-shape-{}.png", name);
        save_thresholds_to_png(&thresh, &filename)?;

        println!(
            "{:<12} {:<10} {}",
            name,
            format!("{}x{}", thresh.width(), thresh.height()),
            filename
        );
    }

    println!("\n✓ All shapes generated!");
    println!("\nKey observations:");
    println!("  - All shapes share the same lattice, so geometry is identical");
    println!("  - Only the turn-on order (and thus the dot growth) differs");
    println!("  - inverted grows white dots from the cell corners");
    println!("  - line-x and line-y trade dots for line screens");

    Ok(())
}
