use collage::{Canvas, FilterKind, Image, Pixel};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn uniform_image(height: usize, width: usize, r: i32, g: i32, b: i32, a: i32) -> Image {
    let px = Pixel::new(r, g, b, a).unwrap();
    Image::new(height, width, 255, vec![px; height * width]).unwrap()
}

fn rgb_at(img: &Image, row: usize, col: usize) -> (u8, u8, u8) {
    let px = img.get(row, col).unwrap();
    (px.red, px.green, px.blue)
}

#[test]
fn background_images_respect_stack_position() {
    init_tracing();
    let mut canvas = Canvas::new(4, 4, "test").unwrap();
    canvas.add_layer(4, 4, "l1").unwrap();
    canvas.add_layer(4, 4, "l2").unwrap();
    canvas.add_layer(4, 4, "l3").unwrap();

    canvas
        .add_image_to_layer("l2", uniform_image(4, 4, 15, 0, 15, 255), 0, 0)
        .unwrap();

    // l3 sees the dark image placed on l2
    let bg3 = canvas.background_of("l3").unwrap();
    for row in 0..4 {
        for col in 0..4 {
            assert_eq!(rgb_at(&bg3, row, col), (15, 0, 15));
        }
    }

    // l1 has nothing beneath it: only the blank backdrop
    let bg1 = canvas.background_of("l1").unwrap();
    for row in 0..4 {
        for col in 0..4 {
            assert_eq!(rgb_at(&bg1, row, col), (255, 255, 255));
        }
    }
}

#[test]
fn difference_against_the_blank_backdrop_inverts() {
    let mut canvas = Canvas::new(4, 4, "test").unwrap();
    canvas.add_layer(4, 4, "l1").unwrap();
    canvas.add_layer(4, 4, "l2").unwrap();

    canvas
        .add_image_to_layer("l2", uniform_image(4, 4, 15, 0, 15, 255), 0, 0)
        .unwrap();
    canvas.set_filter("l2", "difference").unwrap();

    // l1 is still transparent, so the background is opaque white
    assert_eq!(rgb_at(canvas.composite(), 0, 0), (240, 255, 240));
    assert_eq!(rgb_at(canvas.composite(), 3, 3), (240, 255, 240));
}

#[test]
fn higher_opaque_layers_win_and_transparent_ones_never_overwrite() {
    let mut canvas = Canvas::new(2, 2, "test").unwrap();
    canvas.add_layer(2, 2, "bottom").unwrap();
    canvas.add_layer(2, 2, "top").unwrap();

    canvas
        .add_image_to_layer("bottom", uniform_image(2, 2, 10, 20, 30, 255), 0, 0)
        .unwrap();
    // top layer is untouched: transparent everywhere
    assert_eq!(rgb_at(canvas.composite(), 0, 0), (10, 20, 30));

    // an opaque pixel on top wins at its coordinate only
    canvas
        .add_image_to_layer("top", uniform_image(1, 1, 200, 0, 0, 255), 0, 0)
        .unwrap();
    assert_eq!(rgb_at(canvas.composite(), 0, 0), (200, 0, 0));
    assert_eq!(rgb_at(canvas.composite(), 1, 1), (10, 20, 30));
}

#[test]
fn oversize_placement_crops_and_counts_once() {
    let mut canvas = Canvas::new(300, 300, "test").unwrap();
    canvas.add_layer(300, 300, "l").unwrap();

    canvas
        .add_image_to_layer("l", uniform_image(100, 100, 80, 80, 80, 255), 250, 250)
        .unwrap();
    assert_eq!(canvas.layers()[0].placed_images().len(), 1);

    assert_eq!(rgb_at(canvas.composite(), 299, 299), (80, 80, 80));
    // everything past the boundary was dropped; nothing else changed
    assert_eq!(rgb_at(canvas.composite(), 0, 0), (255, 255, 255));
}

#[test]
fn out_of_grid_origin_is_rejected() {
    let mut canvas = Canvas::new(4, 4, "test").unwrap();
    canvas.add_layer(4, 4, "l").unwrap();
    let err = canvas
        .add_image_to_layer("l", uniform_image(1, 1, 0, 0, 0, 255), 4, 0)
        .unwrap_err();
    assert!(err.to_string().contains("layer grid"));
    assert!(canvas.layers()[0].placed_images().is_empty());
}

#[test]
fn mutating_beneath_a_blend_filter_cascades() {
    init_tracing();
    let mut canvas = Canvas::new(2, 2, "test").unwrap();
    canvas.add_layer(2, 2, "under").unwrap();
    canvas.add_layer(2, 2, "over").unwrap();

    canvas
        .add_image_to_layer("over", uniform_image(2, 2, 100, 100, 100, 255), 0, 0)
        .unwrap();
    canvas.set_filter("over", "multiply").unwrap();
    // background is white, so multiply leaves the gray alone (within rounding)
    let before = canvas.composite().get(0, 0).unwrap();
    assert!(before.red.abs_diff(100) <= 1);

    // no operation touches "over", yet its blend output must change
    canvas
        .add_image_to_layer("under", uniform_image(2, 2, 15, 0, 15, 255), 0, 0)
        .unwrap();
    let after = canvas.composite().get(0, 0).unwrap();
    assert_eq!((after.red, after.green, after.blue), (3, 3, 3));
    assert_eq!(canvas.layers()[1].filter().kind(), FilterKind::Multiply);
}

#[test]
fn cascade_feeds_each_blend_into_the_next() {
    let mut canvas = Canvas::new(1, 1, "test").unwrap();
    canvas.add_layer(1, 1, "a").unwrap();
    canvas.add_layer(1, 1, "b").unwrap();
    canvas.add_layer(1, 1, "c").unwrap();

    canvas
        .add_image_to_layer("b", uniform_image(1, 1, 100, 100, 100, 255), 0, 0)
        .unwrap();
    canvas
        .add_image_to_layer("c", uniform_image(1, 1, 200, 200, 200, 255), 0, 0)
        .unwrap();
    canvas.set_filter("b", "multiply").unwrap();
    canvas.set_filter("c", "multiply").unwrap();

    // place a dark image on the bottom layer; b rebuilds first, then c
    // rebuilds against the already-darkened b
    canvas
        .add_image_to_layer("a", uniform_image(1, 1, 0, 0, 0, 255), 0, 0)
        .unwrap();

    let b_px = canvas.layers()[1].image().get(0, 0).unwrap();
    assert_eq!((b_px.red, b_px.green, b_px.blue), (0, 0, 0));
    let c_px = canvas.composite().get(0, 0).unwrap();
    assert_eq!((c_px.red, c_px.green, c_px.blue), (0, 0, 0));
}

#[test]
fn pixels_placed_after_a_filter_change_are_reconciled_lazily() {
    let mut canvas = Canvas::new(1, 2, "test").unwrap();
    canvas.add_layer(1, 2, "l").unwrap();
    canvas.set_filter("l", "red-component").unwrap();

    // placed with a normal tag, but the layer's filter is red-component
    canvas
        .add_image_to_layer("l", uniform_image(1, 2, 10, 20, 30, 255), 0, 0)
        .unwrap();

    assert_eq!(rgb_at(canvas.composite(), 0, 0), (10, 0, 0));
    assert_eq!(rgb_at(canvas.composite(), 0, 1), (10, 0, 0));
}

#[test]
fn smaller_layers_composite_only_where_they_exist() {
    let mut canvas = Canvas::new(3, 3, "test").unwrap();
    canvas.add_layer(1, 1, "small").unwrap();
    canvas
        .add_image_to_layer("small", uniform_image(1, 1, 1, 2, 3, 255), 0, 0)
        .unwrap();

    assert_eq!(rgb_at(canvas.composite(), 0, 0), (1, 2, 3));
    assert_eq!(rgb_at(canvas.composite(), 2, 2), (255, 255, 255));
}
