use pixel_lab::config::{Operation, RunConfig};
use pixel_lab::filters::grayscale::grayscale;
use pixel_lab::filters::noise::gaussian_noise;
use pixel_lab::filters::{haar_wavelet_transform, image_convolution, render_histogram};
use pixel_lab::io::{load_image, save_image};
use pixel_lab::pipeline;
use pixel_lab::{EdgeHandling, Kernel, KernelTemplate, NoiseRng, PixelBuffer};

fn gradient(width: usize, height: usize) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 37 + y * 11) as u8;
            let g = (x * 5 + y * 53) as u8;
            let b = (x * 19 + y * 3) as u8;
            img.pixel_mut(x, y).copy_from_slice(&[r, g, b, 255]);
        }
    }
    img
}

#[test]
fn test_identity_kernel_for_every_edge_mode() {
    let img = gradient(7, 5);
    let kernel = Kernel::template(KernelTemplate::Identity);
    for edge in [EdgeHandling::Extend, EdgeHandling::Wrap, EdgeHandling::Mirror] {
        assert_eq!(image_convolution(&img, &kernel, edge).unwrap(), img, "{edge}");
    }
}

#[test]
fn test_single_pixel_wrap_box_blur() {
    let mut img = PixelBuffer::new(1, 1);
    img.fill(90, 45, 200, 128);
    let kernel = Kernel::new(3, vec![1.0 / 9.0; 9]).unwrap();
    let out = image_convolution(&img, &kernel, EdgeHandling::Wrap).unwrap();
    assert_eq!(out.pixel(0, 0), &[90, 45, 200, 128]);
}

#[test]
fn test_flat_block_wavelet() {
    let img = PixelBuffer::from_gray_levels(2, 2, &[10, 10, 10, 10], 255).unwrap();
    let out = haar_wavelet_transform(&img, 1, 1.0).unwrap();
    let reds: Vec<u8> = out.as_raw().chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(reds, vec![10, 0, 0, 0]);
}

#[test]
fn test_wavelet_level_zero_is_gray_copy() {
    let img = gradient(8, 4);
    let out = pipeline::haar_wavelet(&img, 0, 1.0).unwrap();
    assert_eq!(out, grayscale(&img));
}

#[test]
fn test_seeded_noise_reproducible() {
    let a = gaussian_noise(4, 1.0, &mut NoiseRng::new(2024));
    let b = gaussian_noise(4, 1.0, &mut NoiseRng::new(2024));
    assert_eq!(a, b);

    let mut rng = NoiseRng::new(3);
    let samples = gaussian_noise(100_000, 1.0, &mut rng);
    let mean = samples.iter().map(|&v| v as f64).sum::<f64>() / samples.len() as f64;
    assert!(mean.abs() < 0.02, "mean {mean}");
}

#[test]
fn test_histogram_mode_matches_most_frequent_gray() {
    let mut img = gradient(6, 6);
    for x in 0..6 {
        img.pixel_mut(x, 0).copy_from_slice(&[60, 60, 60, 255]);
        img.pixel_mut(x, 1).copy_from_slice(&[60, 60, 60, 255]);
    }
    let result = pipeline::gray_histogram(&img);
    assert!(result.gray.is_grayscale());
    assert_eq!(result.histogram.mode(), Some(60));
    assert!(result.histogram.bins().iter().all(|&b| (0.0..=1.0).contains(&b)));

    // Column of the mode bin is black over the whole band.
    let chart = render_histogram(&result.histogram);
    assert_eq!(chart, result.chart);
    assert_eq!(chart.pixel(22 + 60, 22)[..3], [0, 0, 0]);
}

#[test]
fn test_equalize_stretches_to_full_range() {
    let result = pipeline::equalize(&gradient(16, 16)).unwrap();
    let levels: Vec<u8> = result.output.as_raw().chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(levels.iter().min(), Some(&0));
    assert_eq!(levels.iter().max(), Some(&255));
    assert!(result.output.is_grayscale());
}

#[test]
fn test_config_drives_convolution() {
    let config: RunConfig = serde_json::from_str(
        r#"{
            "input": "in.png",
            "output_dir": "out",
            "operation": { "op": "convolution", "kernel": { "template": "gaussian_blur_3" }, "edge": "wrap" }
        }"#,
    )
    .unwrap();
    let Operation::Convolution { kernel, edge } = config.operation else {
        panic!("expected convolution");
    };

    let mut flat = PixelBuffer::new(4, 4);
    flat.fill(100, 150, 200, 77);
    let out = pipeline::convolve(&flat, &kernel.build().unwrap(), edge).unwrap();
    assert_eq!(out, flat);
}

#[test]
fn test_chart_survives_png_round_trip() {
    let dir = std::env::temp_dir().join(format!("pixel_lab_it_{}", std::process::id()));
    let path = dir.join("chart.png");
    let chart = pipeline::gray_histogram(&gradient(10, 10)).chart;
    save_image(&chart, &path).unwrap();
    assert_eq!(load_image(&path).unwrap(), chart);
    let _ = std::fs::remove_dir_all(&dir);
}
