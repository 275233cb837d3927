use pixel_lab::config::{load_config, Operation};
use pixel_lab::io::{load_image, save_image};
use pixel_lab::pipeline;
use pixel_lab::{NoiseRng, PixelBuffer};
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let image = load_image(&config.input)
        .map_err(|e| format!("Failed to load {}: {e}", config.input.display()))?;
    let mut rng = NoiseRng::new(config.seed);

    let start = Instant::now();
    let outputs: Vec<(&str, PixelBuffer)> = match &config.operation {
        Operation::GrayHistogram => {
            let result = pipeline::gray_histogram(&image);
            vec![("gray", result.gray), ("histogram", result.chart)]
        }
        Operation::GaussianNoise { sigma } => {
            let result = pipeline::add_gaussian_noise(&image, *sigma, &mut rng);
            vec![("noisy", result.image), ("noise_histogram", result.chart)]
        }
        Operation::Resize { width, height } => {
            let result = pipeline::resize(&image, *width, *height).map_err(|e| e.to_string())?;
            vec![("resized", result)]
        }
        Operation::HaarWavelet { level, scale } => {
            let result = pipeline::haar_wavelet(&image, *level, *scale).map_err(|e| e.to_string())?;
            vec![("wavelet", result)]
        }
        Operation::Equalize => {
            let result = pipeline::equalize(&image).map_err(|e| e.to_string())?;
            vec![
                ("gray", result.input),
                ("gray_histogram", result.input_chart),
                ("equalized", result.output),
                ("equalized_histogram", result.output_chart),
            ]
        }
        Operation::Convolution { kernel, edge } => {
            let kernel = kernel.build().map_err(|e| e.to_string())?;
            let result = pipeline::convolve(&image, &kernel, *edge).map_err(|e| e.to_string())?;
            vec![("convolved", result)]
        }
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let op = config.operation.name();
    for (label, buffer) in &outputs {
        let path = config.output_dir.join(format!("{op}_{label}.png"));
        save_image(buffer, &path).map_err(|e| format!("Failed to save {}: {e}", path.display()))?;
        println!("Saved {} ({}x{})", path.display(), buffer.width(), buffer.height());
    }
    println!(
        "{op} on {}x{} input took {elapsed_ms:.2} ms",
        image.width(),
        image.height()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: pixel_lab <config.json>".to_string()
}
