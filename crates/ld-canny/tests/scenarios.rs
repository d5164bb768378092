use ld_canny::{CannyPipeline, EdgeMap, PipelineConfig};
use ld_core::{BorderPolicy, RawImage, Samples};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn step_config(border: BorderPolicy) -> PipelineConfig {
    PipelineConfig {
        sigma: 1.0,
        kernel_size: 3,
        low_ratio: 0.1,
        high_ratio: 0.2,
        weak_pixel_value: 100,
        strong_pixel_value: 255,
        border,
    }
}

/// 5x5, columns 0-1 dark and 2-4 bright.
fn vertical_step_5x5() -> RawImage {
    let data = (0..25)
        .map(|i| if i % 5 >= 2 { 255u8 } else { 0 })
        .collect();
    RawImage::from_u8(5, 5, data)
}

/// Deterministic texture so tests do not need an RNG crate.
fn textured(w: usize, h: usize, seed: u32) -> RawImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let data = (0..w * h)
        .map(|i| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (state >> 24) as u8 / 8;
            let band = if (i % w) * 3 / w.max(1) == 1 { 160 } else { 40 };
            band + noise
        })
        .collect();
    RawImage::from_u8(w, h, data)
}

fn valid_configs() -> Vec<PipelineConfig> {
    vec![
        PipelineConfig::default(),
        step_config(BorderPolicy::Replicate),
        PipelineConfig {
            sigma: 2.5,
            kernel_size: 7,
            low_ratio: 0.3,
            high_ratio: 0.6,
            weak_pixel_value: 1,
            strong_pixel_value: 2,
            border: BorderPolicy::Reflect101,
        },
        PipelineConfig {
            border: BorderPolicy::Zero,
            ..PipelineConfig::default()
        },
    ]
}

fn strong_columns(map: &EdgeMap, y: usize) -> Vec<usize> {
    map.image()
        .row(y)
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == map.strong_value())
        .map(|(x, _)| x)
        .collect()
}

#[test]
fn vertical_step_marks_only_the_step_columns() {
    init_logging();
    let pipe = CannyPipeline::new(
        step_config(BorderPolicy::Replicate),
        vec![vertical_step_5x5()],
    )
    .expect("valid config");
    let maps = pipe.process().expect("valid batch");
    let map = &maps[0];

    assert_eq!(map.dims(), (5, 5));
    assert!(map.image().row(0).iter().all(|&v| v == 0));
    assert!(map.image().row(4).iter().all(|&v| v == 0));

    // Column 2 responds marginally more than column 1; every other interior
    // column stays empty.
    for y in 1..4 {
        assert_eq!(strong_columns(map, y), [2], "row {y}");
    }
}

#[test]
fn vertical_step_under_reflect101_matches_replicate() {
    let pipe = CannyPipeline::new(
        step_config(BorderPolicy::Reflect101),
        vec![vertical_step_5x5()],
    )
    .expect("valid config");
    let maps = pipe.process().expect("valid batch");

    for y in 1..4 {
        assert_eq!(maps[0].image().row(y), &[0, 0, 255, 0, 0], "row {y}");
    }
}

#[test]
fn out_of_range_unit_samples_fail_the_batch() {
    let data = (0..25)
        .map(|i| if i % 5 >= 2 { f32::MAX } else { 0.0 })
        .collect();
    let images = vec![vertical_step_5x5(), RawImage::from_f32(5, 5, data)];
    let pipe = CannyPipeline::new(PipelineConfig::default(), images).expect("valid config");

    for err in [
        pipe.process().expect_err("huge samples"),
        pipe.process_parallel().expect_err("huge samples"),
    ] {
        assert_eq!(err.index, 1);
        assert!(matches!(
            err.source,
            ld_core::InputError::OutOfRange { x: 2, y: 0, .. }
        ));
    }
}

#[test]
fn vertical_step_under_zero_padding_center_row() {
    let pipe = CannyPipeline::new(step_config(BorderPolicy::Zero), vec![vertical_step_5x5()])
        .expect("valid config");
    let maps = pipe.process().expect("valid batch");

    // Rows 1 and 3 see the darkened top/bottom frame; row 2 does not.
    let cols = strong_columns(&maps[0], 2);
    assert!(!cols.is_empty());
    assert!(cols.iter().all(|&x| x == 1 || x == 2), "{cols:?}");
}

#[test]
fn all_zero_image_yields_empty_map_for_every_config() {
    for cfg in valid_configs() {
        let pipe = CannyPipeline::new(cfg, vec![RawImage::from_u8(10, 10, vec![0; 100])])
            .expect("valid config");
        let maps = pipe.process().expect("valid batch");

        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].dims(), (10, 10));
        assert!(maps[0].image().data().iter().all(|&v| v == 0));
    }
}

#[test]
fn constant_images_yield_empty_maps() {
    let sizes = [(1usize, 1usize), (2, 3), (3, 3), (10, 10), (17, 9), (64, 5)];
    let configs: Vec<_> = valid_configs()
        .into_iter()
        .filter(|c| c.border != BorderPolicy::Zero)
        .collect();

    for cfg in configs {
        for &(w, h) in &sizes {
            let images = vec![
                RawImage::from_u8(w, h, vec![137; w * h]),
                RawImage::from_f32(w, h, vec![0.42; w * h]),
            ];
            let pipe = CannyPipeline::new(cfg.clone(), images).expect("valid config");
            for map in pipe.process().expect("valid batch") {
                assert_eq!(map.dims(), (w, h));
                assert_eq!(map.strong_count(), 0, "{w}x{h} {cfg:?}");
                assert!(map.image().data().iter().all(|&v| v == 0));
            }
        }
    }
}

#[test]
fn outputs_align_with_inputs_and_hold_only_markers() {
    init_logging();
    let sizes = [(3usize, 3usize), (4, 9), (16, 16), (33, 21), (50, 7)];

    for cfg in valid_configs() {
        let images: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| textured(w, h, i as u32))
            .collect();
        let pipe = CannyPipeline::new(cfg.clone(), images).expect("valid config");
        let maps = pipe.process().expect("valid batch");

        assert_eq!(maps.len(), sizes.len());
        for (map, &(w, h)) in maps.iter().zip(&sizes) {
            assert_eq!(map.dims(), (w, h));
            assert!(
                map.image()
                    .data()
                    .iter()
                    .all(|&v| v == 0 || v == cfg.strong_pixel_value)
            );
            assert!(
                !map.image().data().contains(&cfg.weak_pixel_value),
                "weak marker leaked"
            );
        }
    }
}

#[test]
fn repeated_runs_are_byte_identical() {
    let images = vec![textured(40, 30, 7), vertical_step_5x5(), textured(9, 31, 3)];
    let pipe = CannyPipeline::new(PipelineConfig::default(), images).expect("valid config");

    let a = pipe.process().expect("valid batch");
    let b = pipe.process().expect("valid batch");
    let a_bytes: Vec<&[u8]> = a.iter().map(|m| m.image().data()).collect();
    let b_bytes: Vec<&[u8]> = b.iter().map(|m| m.image().data()).collect();
    assert_eq!(a_bytes, b_bytes);
}

#[test]
fn parallel_matches_sequential() {
    let images: Vec<_> = (0..12).map(|i| textured(20 + i, 15 + 2 * i, i as u32)).collect();
    let pipe = CannyPipeline::new(PipelineConfig::default(), images).expect("valid config");

    assert_eq!(
        pipe.process_parallel().expect("valid batch"),
        pipe.process().expect("valid batch")
    );
}

#[test]
fn malformed_middle_image_fails_the_whole_batch() {
    let images = vec![
        textured(8, 8, 1),
        RawImage::new(vec![64], Samples::Byte(vec![0; 64])),
        textured(8, 8, 2),
    ];
    let pipe = CannyPipeline::new(PipelineConfig::default(), images).expect("valid config");

    let err = pipe.process().expect_err("second image is 1-D");
    assert_eq!(err.index, 1);
    assert_eq!(err.source, ld_core::InputError::Rank { rank: 1 });

    let err = pipe.process_parallel().expect_err("second image is 1-D");
    assert_eq!(err.index, 1);
}

#[test]
fn first_bad_image_is_reported() {
    let mut nan = vec![0.5f32; 16];
    nan[5] = f32::INFINITY;
    let images = vec![
        textured(8, 8, 1),
        RawImage::from_f32(4, 4, nan),
        RawImage::from_u8(0, 3, Vec::new()),
    ];
    let pipe = CannyPipeline::new(PipelineConfig::default(), images).expect("valid config");

    for err in [
        pipe.process().expect_err("bad batch"),
        pipe.process_parallel().expect_err("bad batch"),
    ] {
        assert_eq!(err.index, 1);
        assert!(matches!(
            err.source,
            ld_core::InputError::NonFinite { x: 1, y: 1, .. }
        ));
    }
}
