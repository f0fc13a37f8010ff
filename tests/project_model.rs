use collage::{Canvas, FilterKind, Image, Pixel};

fn sample_project() -> Canvas {
    let mut canvas = Canvas::new(4, 4, "demo").unwrap();
    canvas.add_layer(4, 4, "base").unwrap();
    canvas.add_layer(4, 4, "accent").unwrap();

    let px = Pixel::new(15, 0, 15, 255).unwrap();
    let img = Image::new(2, 2, 255, vec![px; 4])
        .unwrap()
        .with_source_id("swatch.ppm");
    canvas.add_image_to_layer("base", img, 1, 1).unwrap();
    canvas.set_filter("accent", "screen").unwrap();
    canvas
}

#[test]
fn json_roundtrip_preserves_the_whole_project() {
    let canvas = sample_project();
    let json = serde_json::to_string(&canvas).unwrap();
    let back: Canvas = serde_json::from_str(&json).unwrap();

    assert_eq!(back.project_name(), "demo");
    assert_eq!(back.layers().len(), 2);
    assert_eq!(back.layers()[1].filter().kind(), FilterKind::Screen);
    assert_eq!(back.composite(), canvas.composite());
    assert_eq!(
        back.layers()[0].placed_images()[0].source_id().unwrap(),
        "swatch.ppm"
    );
}

#[test]
fn structure_report_survives_roundtrip() {
    let canvas = sample_project();
    let json = serde_json::to_string(&canvas).unwrap();
    let back: Canvas = serde_json::from_str(&json).unwrap();
    assert_eq!(back.structure_report(), canvas.structure_report());
    assert!(canvas.structure_report().starts_with("Current Project Structure:\n"));
}

#[test]
fn normalized_images_compose_like_native_full_range_ones() {
    // a 4-bit style image scaled up: (10, 5, 0) at max 10 becomes (255, 128, 0)
    let px = Pixel::new(10, 5, 0, 3).unwrap();
    let mut low = Image::new(1, 1, 10, vec![px]).unwrap();
    low.normalize_to_full_range();

    let mut canvas = Canvas::new(1, 1, "p").unwrap();
    canvas.add_layer(1, 1, "l").unwrap();
    canvas.add_image_to_layer("l", low, 0, 0).unwrap();

    let out = canvas.composite().get(0, 0).unwrap();
    assert_eq!((out.red, out.green, out.blue, out.alpha), (255, 128, 0, 255));
}
