//! Synthetic RGB frames for blur-check tests and benchmarks

use crate::types::Frame;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn rgb_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// Every channel of every pixel set to `value`
pub fn uniform_frame(width: u32, height: u32, value: u8) -> Frame {
    let data = vec![value; rgb_len(width, height)];
    Frame::new(data, width, height, "synthetic_uniform".to_string())
}

/// Uniform RGBA frame with opaque alpha, as read back from a canvas
pub fn uniform_rgba_frame(width: u32, height: u32, value: u8) -> Frame {
    let pixels = width as usize * height as usize;
    let data = [value, value, value, 255].repeat(pixels);
    Frame::from_rgba(data, width, height, "synthetic_uniform_rgba".to_string())
}

/// Black and white checkerboard with square cells of `cell` pixels
pub fn checkerboard_frame(width: u32, height: u32, cell: u32) -> Frame {
    let cell = cell.max(1);
    let mut data = vec![0u8; rgb_len(width, height)];

    for y in 0..height {
        for x in 0..width {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                let idx = (y as usize * width as usize + x as usize) * 3;
                data[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
    }

    Frame::new(data, width, height, "synthetic_checkerboard".to_string())
}

/// Smooth left-to-right ramp from black to white
pub fn gradient_frame(width: u32, height: u32) -> Frame {
    let mut data = vec![0u8; rgb_len(width, height)];

    for y in 0..height {
        for x in 0..width {
            let intensity = (x as u64 * 255 / width.max(1) as u64) as u8;
            let idx = (y as usize * width as usize + x as usize) * 3;
            data[idx..idx + 3].copy_from_slice(&[intensity, intensity, intensity]);
        }
    }

    Frame::new(data, width, height, "synthetic_gradient".to_string())
}

/// Per-channel uniform noise over 0-255, reproducible for a given `seed`
pub fn noise_frame(seed: u64, width: u32, height: u32) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rgb_len(width, height)).map(|_| rng.gen::<u8>()).collect();

    Frame::new(data, width, height, "synthetic_noise".to_string())
}
