#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use slice_sixel::{Palette, SixelEncoder};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    levels: u8,
    offset: f32,
    scale: f32,
    pixels: Vec<f32>,
    crosshairs: Option<(u8, u8)>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(mut palette) = Palette::new(input.levels as usize) else {
        return;
    };
    palette.set_scaling(input.offset, input.scale);

    let Ok(mut encoder) = SixelEncoder::new(input.width as usize, input.height as usize, &palette)
    else {
        return;
    };

    // Writes past the image must be rejected, never panic
    for (i, &value) in input.pixels.iter().enumerate() {
        let x = i % (input.width as usize + 1);
        let y = i / (input.width as usize + 1);
        let ok = encoder.set_pixel(x, y, value).is_ok();
        assert_eq!(ok, x < input.width as usize && y < input.height as usize);
    }
    if let Some((x, y)) = input.crosshairs {
        let _ = encoder.draw_crosshairs(x as usize, y as usize);
    }

    let sixel = encoder.encode();
    assert!(sixel.starts_with("\x1bPq"));
    assert!(sixel.ends_with("\x1b\\"));
    assert_eq!(
        sixel.matches('-').count(),
        (input.height as usize).div_ceil(6)
    );
});
