//! End-to-end properties of analysis and rendering on synthetic frames.
//!
//! Run with: `cargo test -p scopekit-core`

use scopekit_core::analyzer::{DEFAULT_SAMPLE_BUDGET, sample_stride};
use scopekit_core::color::{Rgb8, luminance};
use scopekit_core::frame::{self, CropRegion, FrameView, OwnedFrame, PixelLayout};
use scopekit_core::{
    FrameError, IntensityMap, ScopeConfig, ScopeKind, ScopeScratch, ScopeVisibility, analyze,
    render_scopes,
};

/// Deterministic pseudo-random RGBA frame (xorshift).
fn noise_frame(width: u32, height: u32, seed: u32) -> OwnedFrame {
    let mut state = seed.max(1);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        data.extend_from_slice(&[r, g, b, 255]);
    }
    OwnedFrame::new(width, height, PixelLayout::Rgba, data)
}

#[test]
fn test_histogram_sums_equal_pixel_count() {
    for (w, h) in [(1, 1), (3, 7), (64, 48), (321, 17)] {
        let frame = noise_frame(w, h, w * 31 + h);
        let a = analyze(&frame.view().unwrap(), DEFAULT_SAMPLE_BUDGET).unwrap();
        let n = w * h;
        assert_eq!(a.histogram.lum.iter().sum::<u32>(), n);
        assert_eq!(a.histogram.r.iter().sum::<u32>(), n);
        assert_eq!(a.histogram.g.iter().sum::<u32>(), n);
        assert_eq!(a.histogram.b.iter().sum::<u32>(), n);
    }
}

#[test]
fn test_uniform_gray_waveform_is_single_value() {
    let k = 77;
    let frame = OwnedFrame::solid(50, 20, Rgb8::new(k, k, k));
    let a = analyze(&frame.view().unwrap(), DEFAULT_SAMPLE_BUDGET).unwrap();
    let expected = luminance(k, k, k);
    assert_eq!(a.waveform.len(), 50);
    for column in a.waveform.columns() {
        assert_eq!(column.len(), 20);
        assert!(column.iter().all(|&v| v == expected));
    }

    let config = ScopeConfig::default();
    let mut map = IntensityMap::default();
    scopekit_core::scopes::waveform::render(&a, &config, &mut map);
    let size = config.canvas.waveform;
    assert_eq!(map.lit_cells(), size.width as usize);
    let row = (0..size.height).find(|&y| map.get(0, y) > 0).unwrap();
    assert!((0..size.width).all(|x| map.get(x, row) > 0));
}

#[test]
fn test_uniform_gray_chroma_is_centered() {
    let frame = OwnedFrame::solid(30, 30, Rgb8::new(180, 180, 180));
    let a = analyze(&frame.view().unwrap(), DEFAULT_SAMPLE_BUDGET).unwrap();
    assert!(!a.points.is_empty());
    for p in &a.points {
        assert!((p.cb - 128.0).abs() <= 1.0);
        assert!((p.cr - 128.0).abs() <= 1.0);
    }
}

#[test]
fn test_pure_red_histogram() {
    let frame = OwnedFrame::solid(13, 9, Rgb8::new(200, 0, 0));
    let a = analyze(&frame.view().unwrap(), DEFAULT_SAMPLE_BUDGET).unwrap();
    let n = 13 * 9;
    assert_eq!(a.histogram.r[200], n);
    assert_eq!(a.histogram.g[0], n);
    assert_eq!(a.histogram.b[0], n);
}

#[test]
fn test_sample_count_tracks_stride() {
    for (w, h) in [(320, 180), (320, 320), (400, 300), (999, 101)] {
        let frame = noise_frame(w, h, 7);
        let a = analyze(&frame.view().unwrap(), DEFAULT_SAMPLE_BUDGET).unwrap();
        let n = (w * h) as usize;
        let stride = sample_stride(n, DEFAULT_SAMPLE_BUDGET);
        assert_eq!(a.sample_stride, stride);
        let expected = n / stride;
        assert!(a.points.len().abs_diff(expected) <= 1, "{w}x{h}: {} vs {expected}", a.points.len());
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let frame = noise_frame(97, 61, 42);
    let view = frame.view().unwrap();
    let first = analyze(&view, DEFAULT_SAMPLE_BUDGET).unwrap();
    let second = analyze(&view, DEFAULT_SAMPLE_BUDGET).unwrap();
    assert_eq!(first, second);

    let config = ScopeConfig::default();
    let mut scratch = ScopeScratch::new();
    let a = render_scopes(&first, &config, ScopeVisibility::default(), &mut scratch);
    let b = render_scopes(&second, &config, ScopeVisibility::default(), &mut scratch);
    assert_eq!(a, b);
}

#[test]
fn test_red_black_rows_scenario() {
    // 4x4, rows alternate pure red and pure black.
    let mut data = Vec::new();
    for y in 0..4 {
        for _x in 0..4 {
            if y % 2 == 0 {
                data.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                data.extend_from_slice(&[0, 0, 0, 255]);
            }
        }
    }
    let view = FrameView::new(&data, 4, 4, PixelLayout::Rgba).unwrap();
    let a = analyze(&view, DEFAULT_SAMPLE_BUDGET).unwrap();

    assert_eq!(a.histogram.r[255], 8);
    assert_eq!(a.histogram.r[0], 8);
    assert_eq!(a.histogram.g[0], 16);
    assert_eq!(a.histogram.b[0], 16);
    assert_eq!(a.histogram.lum[54], 8);
    assert_eq!(a.histogram.lum[0], 8);
    assert_eq!(a.histogram.lum.iter().sum::<u32>(), 16);
}

#[test]
fn test_invalid_input_is_rejected_not_panicking() {
    assert!(matches!(
        FrameView::new(&[], 0, 0, PixelLayout::Rgb),
        Err(FrameError::EmptyFrame { .. })
    ));
    assert!(matches!(
        FrameView::new(&[1, 2, 3, 4], 2, 2, PixelLayout::Rgba),
        Err(FrameError::SizeMismatch { .. })
    ));
}

#[test]
fn test_all_scopes_render_opaque_at_canvas_size() {
    let frame = noise_frame(200, 120, 3);
    let a = analyze(&frame.view().unwrap(), DEFAULT_SAMPLE_BUDGET).unwrap();
    let config = ScopeConfig::default();
    let images = render_scopes(&a, &config, ScopeVisibility::default(), &mut ScopeScratch::new());

    assert_eq!(images.len(), 4);
    for (kind, raster) in images.iter() {
        let expected = match kind {
            ScopeKind::Waveform => config.canvas.waveform,
            ScopeKind::Parade => config.canvas.parade,
            ScopeKind::Histogram => config.canvas.histogram,
            ScopeKind::Vectorscope => {
                let d = config.canvas.vectorscope.width;
                scopekit_core::config::CanvasSize::new(d, d)
            }
        };
        assert_eq!((raster.width(), raster.height()), (expected.width, expected.height), "{kind}");
        assert!(raster.as_bytes().chunks_exact(4).all(|p| p[3] == 255), "{kind}");
    }
}

#[test]
fn test_cropped_prepare_then_analyze() {
    let frame = noise_frame(1280, 720, 11);
    let crop = CropRegion::new(0.25, 0.25, 0.5, 0.5);
    let prepared = frame::prepare(&frame.view().unwrap(), Some(crop), 320).unwrap();
    assert_eq!((prepared.width, prepared.height), (320, 180));
    let a = analyze(&prepared.view().unwrap(), DEFAULT_SAMPLE_BUDGET).unwrap();
    assert_eq!(a.histogram.total(), 320 * 180);
}

#[test]
fn test_degenerate_crop_still_analyzes() {
    let frame = noise_frame(64, 64, 5);
    let crop = CropRegion::new(0.3, 0.3, 0.0, 0.0);
    let prepared = frame::prepare(&frame.view().unwrap(), Some(crop), 320).unwrap();
    assert_eq!((prepared.width, prepared.height), (10, 10));
    let a = analyze(&prepared.view().unwrap(), DEFAULT_SAMPLE_BUDGET).unwrap();
    assert_eq!(a.histogram.total(), 100);
}
