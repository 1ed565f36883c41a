use imseg_core::{ColorImage, GrayImage};
use imseg_threshold::{
    apply_mask, background_reference, bounding_box, classify, normalized_histogram,
    otsu_objective, otsu_select, otsu_threshold, BoundingBox, ReferencePolicy, RegionParams,
};

/// Dark background with a bright blob at rows 12..30, cols 20..41, plus mild texture.
fn blob_image() -> GrayImage {
    GrayImage::from_fn(64, 48, |r, c| {
        let noise = ((r * 7 + c * 13) % 5) as u8;
        if (12..30).contains(&r) && (20..41).contains(&c) {
            200 + noise
        } else {
            40 + noise
        }
    })
}

#[test]
fn otsu_separates_blob_from_background() {
    let img = blob_image();
    let hist = normalized_histogram(&img.view()).expect("histogram");
    let t = otsu_threshold(&hist);
    assert!(t > 44 && t <= 200, "threshold {t}");

    let best = otsu_select(&hist).objective;
    for cand in 1..=255u8 {
        assert!(otsu_objective(&hist, cand) >= best - 1e-6 * best);
    }
}

#[test]
fn border_policy_recovers_blob_and_tight_box() {
    let img = blob_image();
    let view = img.view();
    let t = otsu_threshold(&normalized_histogram(&view).unwrap());
    let params = RegionParams::default();
    let reference = background_reference(&view, t, &params).unwrap();
    assert!(reference < t as f64);

    let mask = classify(&view, t, reference);
    let masked = apply_mask(ColorImage::from_gray(&view), &mask).unwrap();
    let expected = BoundingBox {
        min_row: 12,
        min_col: 20,
        max_row: 29,
        max_col: 40,
    };
    assert_eq!(masked.bounding_box, Some(expected));
    assert_eq!(bounding_box(&mask), Some(expected));
    assert_eq!(mask.count_foreground(), 18 * 21);

    for row in 0..img.height {
        for col in 0..img.width {
            let inside = expected.contains(row, col);
            assert_eq!(mask.is_foreground(row, col), inside);
            if !inside {
                assert_eq!(masked.image.pixel(row, col), &[0]);
            } else {
                assert_eq!(masked.image.pixel(row, col), &[img.get(row, col)]);
            }
        }
    }
}

#[test]
fn center_policy_agrees_with_border_policy_on_centered_object() {
    let img = GrayImage::from_fn(40, 40, |r, c| {
        if (10..30).contains(&r) && (10..30).contains(&c) {
            180
        } else {
            20
        }
    });
    let view = img.view();
    let t = otsu_threshold(&normalized_histogram(&view).unwrap());

    let border = RegionParams::with_policy(ReferencePolicy::Border);
    let center = RegionParams::with_policy(ReferencePolicy::Center);
    let m_border = classify(&view, t, background_reference(&view, t, &border).unwrap());
    let m_center = classify(&view, t, background_reference(&view, t, &center).unwrap());
    assert_eq!(m_border, m_center);
    assert_eq!(m_center.get(20, 20), 1);
}

#[test]
fn bright_background_inverts_the_classes() {
    let img = GrayImage::from_fn(40, 40, |r, c| {
        if (10..30).contains(&r) && (10..30).contains(&c) {
            20
        } else {
            230
        }
    });
    let view = img.view();
    let t = otsu_threshold(&normalized_histogram(&view).unwrap());
    let reference = background_reference(&view, t, &RegionParams::default()).unwrap();
    assert!(reference >= t as f64);

    let mask = classify(&view, t, reference);
    assert_eq!(mask.get(0, 0), 0);
    assert_eq!(mask.get(15, 15), 1);
}

#[test]
fn rerunning_yields_identical_results() {
    let img = blob_image();
    let view = img.view();
    let run = || {
        let t = otsu_threshold(&normalized_histogram(&view).unwrap());
        let reference = background_reference(&view, t, &RegionParams::default()).unwrap();
        let mask = classify(&view, t, reference);
        (t, apply_mask(ColorImage::from_gray(&view), &mask).unwrap().image)
    };
    assert_eq!(run(), run());
}
