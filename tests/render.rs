use std::path::{Path, PathBuf};

use paperdoll::{CatalogConfig, PaperdollError, RenderRequest, TraitIndex};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "paperdoll_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn config_for(root: &Path) -> CatalogConfig {
    CatalogConfig {
        assets_base_path: root.to_path_buf(),
        ..CatalogConfig::default()
    }
}

fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .unwrap();
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

fn fox_base_dir(root: &Path) -> PathBuf {
    root.join("avatars")
        .join("foxes")
        .join("traits")
        .join("shape")
        .join("fox")
}

fn request(traits: &[&str]) -> RenderRequest {
    RenderRequest {
        base: "fox".to_string(),
        traits: traits.iter().map(|t| t.to_string()).collect(),
        variant: None,
        variant_traits: vec![],
        width: 8,
        height: 8,
    }
}

/// An 8x8 blue background, a 4x4 red body at depth 0 and a 2x2 green hat
/// at depth 1, all depths positional.
fn seed_stack_project(root: &Path) {
    let base = fox_base_dir(root);
    write_file(
        &base.join("body").join("data.json"),
        r#"[
            {"id":"body-red","name":"Red Body","path":"red.png","isImage":true},
            {"id":"phantom","name":"Phantom","path":"missing.png","isImage":true}
        ]"#,
    );
    write_png(&base.join("body").join("red.png"), 4, 4, RED);
    write_file(
        &base.join("headgear").join("data.json"),
        r#"[{"id":"hat-green","name":"Green Hat","path":"green.png","isImage":true}]"#,
    );
    write_png(&base.join("headgear").join("green.png"), 2, 2, GREEN);

    let background = root.join("avatars").join("foxes").join("traits").join("background");
    write_file(
        &background.join("data.json"),
        r#"[{"id":"sky","name":"Sky","path":"sky.png","isImage":true}]"#,
    );
    write_png(&background.join("sky.png"), 8, 8, BLUE);
}

/// A variant jacket nested between an 8x8 red body at depth 5 and a 4x4
/// blue hat at depth 6.
fn seed_variant_project(root: &Path) {
    let base = fox_base_dir(root);
    write_file(
        &base.join("body").join("data.json"),
        r#"[{"id":"body-red","name":"Red Body","path":"red.png","isImage":true}]"#,
    );
    write_png(&base.join("body").join("red.png"), 8, 8, RED);
    write_file(
        &base.join("headgear").join("data.json"),
        r#"[{"id":"hat-blue","name":"Blue Hat","path":"blue.png","isImage":true}]"#,
    );
    write_png(&base.join("headgear").join("blue.png"), 4, 4, BLUE);
    write_file(
        &base.join("categories.json"),
        r#"{"body":{"zIndex":5},"headgear":{"zIndex":6},"variant":{"zIndex":5}}"#,
    );
    write_file(
        &base.join("variant").join("data.json"),
        r#"[{"id":"outfit","name":"Outfit","path":"outfit"}]"#,
    );
    let jacket = base.join("variant").join("outfit").join("jacket");
    write_file(
        &jacket.join("data.json"),
        r#"[{"id":"denim","name":"Denim","path":"denim.png","isImage":true}]"#,
    );
    write_png(&jacket.join("denim.png"), 8, 8, GREEN);
    write_file(
        &base.join("variant").join("outfit").join("categories.json"),
        r#"{"jacket":{"zIndex":2}}"#,
    );
}

#[test]
fn layers_stack_by_depth_not_request_order() {
    let tmp = temp_dir("stack_by_depth");
    seed_stack_project(&tmp);
    let config = config_for(&tmp);

    let png = paperdoll::composite_avatar(
        &config,
        "foxes",
        &request(&["hat-green", "sky", "body-red"]),
    )
    .unwrap();
    let img = decode(&png);
    assert_eq!(img.dimensions(), (8, 8));

    // Background fills the frame, the body sits centered over it, the hat
    // centered over the body.
    assert_eq!(img.get_pixel(0, 0).0, BLUE);
    assert_eq!(img.get_pixel(2, 2).0, RED);
    assert_eq!(img.get_pixel(3, 3).0, GREEN);
    assert_eq!(img.get_pixel(5, 5).0, RED);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn render_is_deterministic_and_order_insensitive() {
    let tmp = temp_dir("deterministic");
    seed_stack_project(&tmp);
    let config = config_for(&tmp);

    let scrambled = paperdoll::composite_avatar(
        &config,
        "foxes",
        &request(&["hat-green", "sky", "body-red"]),
    )
    .unwrap();
    let ordered = paperdoll::composite_avatar(
        &config,
        "foxes",
        &request(&["sky", "body-red", "hat-green"]),
    )
    .unwrap();
    assert_eq!(scrambled, ordered);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn variant_layers_nest_between_categories() {
    let tmp = temp_dir("variant_nesting");
    seed_variant_project(&tmp);
    let config = config_for(&tmp);

    let req = RenderRequest {
        base: "fox".to_string(),
        traits: vec!["body-red".to_string(), "hat-blue".to_string()],
        variant: Some("outfit".to_string()),
        variant_traits: vec!["denim".to_string()],
        width: 8,
        height: 8,
    };
    let png = paperdoll::composite_avatar(&config, "foxes", &req).unwrap();
    let img = decode(&png);

    // The jacket covers the body, the hat covers the jacket's center.
    assert_eq!(img.get_pixel(0, 0).0, GREEN);
    assert_eq!(img.get_pixel(3, 3).0, BLUE);
    assert_eq!(img.get_pixel(7, 7).0, GREEN);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn hidden_sub_categories_still_render() {
    let tmp = temp_dir("hidden_still_renders");
    seed_variant_project(&tmp);
    write_file(
        &fox_base_dir(&tmp)
            .join("variant")
            .join("outfit")
            .join("categories.json"),
        r#"{"jacket":{"hidden":true,"zIndex":2}}"#,
    );
    let config = config_for(&tmp);

    // Hidden from listings entirely.
    let variants = paperdoll::items::load_variants(&config, "foxes", "fox").unwrap();
    assert!(variants[0].sub_categories.is_empty());

    // Still resolvable for rendering; its depth falls back to the variant
    // base, so the later body layer at the same depth covers it.
    let req = RenderRequest {
        base: "fox".to_string(),
        traits: vec!["body-red".to_string()],
        variant: Some("outfit".to_string()),
        variant_traits: vec!["denim".to_string()],
        width: 8,
        height: 8,
    };
    let png = paperdoll::composite_avatar(&config, "foxes", &req).unwrap();
    let img = decode(&png);
    assert_eq!(img.get_pixel(0, 0).0, RED);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn unknown_selections_are_resolution_errors() {
    let tmp = temp_dir("unknown_selection");
    seed_variant_project(&tmp);
    let config = config_for(&tmp);

    let err = paperdoll::composite_avatar(&config, "foxes", &request(&["ghost"])).unwrap_err();
    assert!(matches!(err, PaperdollError::Resolution(_)));
    assert!(err.to_string().contains("ghost"));
    assert!(err.is_client_fault());

    let req = RenderRequest {
        base: "fox".to_string(),
        traits: vec!["body-red".to_string()],
        variant: Some("outfit".to_string()),
        variant_traits: vec!["velvet".to_string()],
        width: 8,
        height: 8,
    };
    let err = paperdoll::composite_avatar(&config, "foxes", &req).unwrap_err();
    assert!(matches!(err, PaperdollError::Resolution(_)));
    assert!(err.to_string().contains("velvet"));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_layer_file_is_a_resolution_error() {
    let tmp = temp_dir("missing_file");
    seed_stack_project(&tmp);
    let config = config_for(&tmp);

    let err = paperdoll::composite_avatar(&config, "foxes", &request(&["phantom"])).unwrap_err();
    assert!(matches!(err, PaperdollError::Resolution(_)));
    assert!(err.to_string().contains("phantom"));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn validation_runs_before_touching_the_catalog() {
    let config = config_for(Path::new("/nonexistent/paperdoll-render"));

    let mut req = request(&["body-red"]);
    req.width = 0;
    let err = paperdoll::composite_avatar(&config, "foxes", &req).unwrap_err();
    assert!(matches!(err, PaperdollError::Validation(_)));

    let err = paperdoll::composite_avatar(&config, "foxes", &request(&[])).unwrap_err();
    assert!(matches!(err, PaperdollError::Validation(_)));
}

#[test]
fn missing_base_is_not_found() {
    let tmp = temp_dir("missing_base");
    seed_stack_project(&tmp);
    let config = config_for(&tmp);

    let mut req = request(&["body-red"]);
    req.base = "wolf".to_string();
    let err = paperdoll::composite_avatar(&config, "foxes", &req).unwrap_err();
    assert!(matches!(err, PaperdollError::NotFound(_)));
    assert!(err.to_string().contains("wolf"));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn output_resizes_to_requested_dimensions() {
    let tmp = temp_dir("resize_output");
    seed_stack_project(&tmp);
    let config = config_for(&tmp);

    let mut req = request(&["sky", "body-red"]);
    req.width = 16;
    req.height = 16;
    let png = paperdoll::composite_avatar(&config, "foxes", &req).unwrap();
    assert_eq!(decode(&png).dimensions(), (16, 16));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn index_prefers_first_category_in_scan_order() {
    let tmp = temp_dir("index_first_match");
    let base = fox_base_dir(&tmp);
    // The same trait ID appears in two categories; scan order decides.
    write_file(
        &base.join("arms").join("data.json"),
        r#"[{"id":"shared","name":"Shared","path":"arms.png","isImage":true}]"#,
    );
    write_png(&base.join("arms").join("arms.png"), 2, 2, RED);
    write_file(
        &base.join("headgear").join("data.json"),
        r#"[{"id":"shared","name":"Shared","path":"hat.png","isImage":true}]"#,
    );
    write_png(&base.join("headgear").join("hat.png"), 2, 2, GREEN);
    let config = config_for(&tmp);

    let categories = paperdoll::meta::load_category_meta(&config, "foxes", "fox").unwrap();
    let index = TraitIndex::build(&config, "foxes", "fox", &categories).unwrap();
    assert_eq!(index.len(), 1);

    let entry = index.get("shared").unwrap();
    assert_eq!(entry.category, "arms");
    assert_eq!(entry.z_index, 0);
    assert!(entry.file_path.ends_with("arms/arms.png"));

    let mut req = request(&["shared"]);
    req.width = 2;
    req.height = 2;
    let png = paperdoll::composite_avatar(&config, "foxes", &req).unwrap();
    assert_eq!(decode(&png).get_pixel(0, 0).0, RED);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn renders_cleanly_with_tracing_initialized() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let tmp = temp_dir("tracing_render");
    seed_stack_project(&tmp);
    let config = config_for(&tmp);

    let png =
        paperdoll::composite_avatar(&config, "foxes", &request(&["sky", "body-red"])).unwrap();
    assert!(!png.is_empty());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn animated_traits_never_reach_the_index() {
    let tmp = temp_dir("animated_excluded");
    let base = fox_base_dir(&tmp);
    write_file(
        &base.join("eyes").join("data.json"),
        r#"[
            {"id":"blink","name":"Blink","path":"blink","isAnimated":true,"isImage":true},
            {"id":"calm","name":"Calm","path":"calm.png","isImage":true}
        ]"#,
    );
    write_png(&base.join("eyes").join("calm.png"), 2, 2, BLUE);
    let config = config_for(&tmp);

    let categories = paperdoll::meta::load_category_meta(&config, "foxes", "fox").unwrap();
    let index = TraitIndex::build(&config, "foxes", "fox", &categories).unwrap();
    assert!(index.get("blink").is_none());
    assert!(index.get("calm").is_some());

    let err = paperdoll::composite_avatar(&config, "foxes", &request(&["blink"])).unwrap_err();
    assert!(matches!(err, PaperdollError::Resolution(_)));

    std::fs::remove_dir_all(&tmp).ok();
}
