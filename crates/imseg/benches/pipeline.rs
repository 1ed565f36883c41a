use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use imseg::cluster::{silhouette_score, KMeans};
use imseg::core::GrayImage;
use imseg::segment_gray;
use imseg::texture::local_binary_pattern;
use imseg::threshold::{normalized_histogram, otsu_threshold, RegionParams};

const SIZES: [(usize, usize); 3] = [(320, 240), (640, 480), (1280, 720)];

fn synthetic(width: usize, height: usize) -> GrayImage {
    GrayImage::from_fn(width, height, |r, c| {
        let inside = r > height / 4 && r < 3 * height / 4 && c > width / 4 && c < 3 * width / 4;
        let noise = ((r * 31 + c * 17) % 23) as u8;
        if inside {
            180 + noise
        } else {
            40 + noise
        }
    })
}

fn bench_otsu(c: &mut Criterion) {
    let mut group = c.benchmark_group("otsu");
    for &(width, height) in SIZES.iter() {
        let img = synthetic(width, height);
        let size_str = format!("{width}x{height}");
        group.bench_with_input(BenchmarkId::new("histogram+threshold", &size_str), &img, |b, img| {
            b.iter(|| {
                let hist = normalized_histogram(black_box(&img.view())).unwrap();
                otsu_threshold(&hist)
            })
        });
        group.bench_with_input(BenchmarkId::new("segment", &size_str), &img, |b, img| {
            b.iter(|| segment_gray(black_box(&img.view()), &RegionParams::default()).unwrap())
        });
    }
    group.finish();
}

fn bench_lbp(c: &mut Criterion) {
    let mut group = c.benchmark_group("lbp");
    for &(width, height) in SIZES.iter() {
        let img = synthetic(width, height);
        let size_str = format!("{width}x{height}");
        group.bench_with_input(BenchmarkId::new("codes", &size_str), &img, |b, img| {
            b.iter(|| local_binary_pattern(black_box(&img.view())))
        });
    }
    group.finish();
}

fn bench_silhouette(c: &mut Criterion) {
    let mut group = c.benchmark_group("silhouette");
    for n in [100usize, 200, 400] {
        let features: Vec<f64> = (0..n).map(|i| ((i * 37) % 101) as f64).collect();
        let labels = KMeans::default().fit(&features, 3).labels;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| silhouette_score(black_box(&features), black_box(&labels), 3).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_otsu, bench_lbp, bench_silhouette);
criterion_main!(benches);
