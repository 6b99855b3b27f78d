/**
 * Example: Dither an image with a halftone screen
 *
 * This example shows how to halftone an image with a generated screen
 * tile, with custom colors and options.
 *
 * Run with:
 *   cargo run --example dither_image
 */

use halftone_screen::{
    apply_dithering, generate_thresholds, Color, DitherOptions, DotShape, ScreenParams,
    ScreenTile,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Halftone Dithering Example\n");

    // First, generate a screen tile
    println!("Step 1: Generating screen tile...");
    let params = ScreenParams {
        angle: 45.0,
        frequency: 53.0,
        dot_shape: DotShape::Round,
        ..Default::default()
    };

    let thresh = generate_thresholds(&params)?;
    let tile = ScreenTile::from_thresholds(&thresh);
    println!("  ✓ Generated {}x{} screen tile\n", thresh.width(), thresh.height());

    // Create a simple test gradient image
    println!("Step 2: Creating test gradient image...");
    let width = 256;
    let height = 256;
    let mut gradient_data = Vec::with_capacity((width * height * 3) as usize);

    for _y in 0..height {
        for x in 0..width {
            // Create a horizontal gradient from black to white
            let value = (x * 255 / (width - 1)) as u8;
            gradient_data.push(value);
            gradient_data.push(value);
            gradient_data.push(value);
        }
    }

    let gradient_img = image::RgbImage::from_vec(width, height, gradient_data)
        .expect("Failed to create gradient image");
    gradient_img.save("example-gradient.png")?;
    println!("  ✓ Created test gradient image\n");

    // Apply dithering with black and white
    println!("Step 3: Applying dithering (black & white)...");
    let bw_options = DitherOptions {
        foreground: Color::from_hex("#000000")?,
        background: Color::from_hex("#ffffff")?,
        width: None,
        height: None,
        contrast: None,
    };

    apply_dithering(
        "example-gradient.png",
        "example-dithered-bw.png",
        &tile,
        bw_options,
    )?;
    println!("  ✓ Saved to example-dithered-bw.png\n");

    // Apply dithering with custom colors (sepia)
    println!("Step 4: Applying dithering (sepia tone)...");
    let sepia_options = DitherOptions {
        foreground: Color::from_hex("#704214")?,
        background: Color::from_hex("#f4e8d8")?,
        width: None,
        height: None,
        contrast: Some(1.2),
    };

    apply_dithering(
        "example-gradient.png",
        "example-dithered-sepia.png",
        &tile,
        sepia_options,
    )?;
    println!("  ✓ Saved to example-dithered-sepia.png\n");

    println!("✓ All examples completed!");
    println!("\nGenerated files:");
    println!("  - example-gradient.png (test gradient)");
    println!("  - example-dithered-bw.png (black & white)");
    println!("  - example-dithered-sepia.png (sepia tone)");

    Ok(())
}
