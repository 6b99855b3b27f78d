/**
 * Example: Generate a halftone screen tile
 *
 * This example generates a classic 45-degree round-dot screen, prints the
 * achieved geometry, and saves the threshold tile as a PNG preview.
 *
 * Run with:
 *   cargo run --example generate_screen
 */

use halftone_screen::{
    generate, generate_thresholds, save_thresholds_to_png, ScreenOutput, ScreenParams,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Halftone Screen Generation Example\n");

    // Classic 45-degree round-dot screen at 75 lpi on a 300 dpi device
    println!("Step 1: Generating 45 deg / 75 lpi screen...");
    let params = ScreenParams {
        angle: 45.0,
        frequency: 75.0,
        ..Default::default()
    };

    let screen = generate(&params)?;
    println!(
        "  ✓ Achieved {:.2} deg at {:.2} lpi ({}x{} tile, {} levels)\n",
        screen.report.actual_angle,
        screen.report.actual_frequency,
        screen.report.width,
        screen.report.height,
        screen.report.levels,
    );

    // Write the Type 3 halftone dictionary
    println!("Step 2: Writing halftone dictionary...");
    if let ScreenOutput::Type3(dict) = &screen.output {
        std::fs::write("example-screen.ps", dict.to_postscript())?;
        println!("  ✓ Saved to example-screen.ps\n");
    }

    // Save a grayscale preview of the threshold tile
    println!("Step 3: Saving threshold tile preview...");
    let thresh = generate_thresholds(&params)?;
    save_thresholds_to_png(&thresh, "example-screen.png")?;
    println!("  ✓ Saved to example-screen.png\n");

    println!("✓ All steps completed!");
    println!("\nGenerated files:");
    println!("  - example-screen.ps (HalftoneType 3 dictionary)");
    println!("  - example-screen.png (threshold tile preview)");

    Ok(())
}
