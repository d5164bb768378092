use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ld_canny::{CannyPipeline, PipelineConfig};
use ld_core::RawImage;

fn build_slanted_u8(width: usize, height: usize) -> RawImage {
    let theta = 20.0f32.to_radians();
    let nx = theta.cos();
    let ny = theta.sin();
    let t = nx * (0.5 * width as f32) + ny * (0.5 * height as f32);

    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let d = nx * x as f32 + ny * y as f32 - t;
            data[y * width + x] = if d >= 0.0 { 255 } else { 0 };
        }
    }

    RawImage::from_u8(width, height, data)
}

fn bench_detect_1280x1024(c: &mut Criterion) {
    let img = build_slanted_u8(1280, 1024);
    let pipe = CannyPipeline::new(PipelineConfig::default(), Vec::new()).expect("valid config");

    c.bench_function("canny_detect_u8_1280x1024", |b| {
        b.iter(|| {
            let out = pipe.detect(black_box(&img)).expect("valid image");
            black_box(out.strong_count());
        });
    });
}

fn bench_batch_parallel(c: &mut Criterion) {
    let images = (0..8).map(|_| build_slanted_u8(640, 480)).collect();
    let pipe = CannyPipeline::new(PipelineConfig::default(), images).expect("valid config");

    c.bench_function("canny_batch8_640x480_sequential", |b| {
        b.iter(|| black_box(pipe.process().expect("valid batch").len()));
    });
    c.bench_function("canny_batch8_640x480_parallel", |b| {
        b.iter(|| black_box(pipe.process_parallel().expect("valid batch").len()));
    });
}

criterion_group!(benches, bench_detect_1280x1024, bench_batch_parallel);
criterion_main!(benches);
