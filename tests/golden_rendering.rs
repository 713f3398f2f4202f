use std::fs;
use std::path::{Path, PathBuf};

use multitables::document::SceneDocument;
use multitables::rendering::image::FsImageDecoder;
use multitables::rendering::text::BlockTextRenderer;
use multitables::{RenderConfig, Renderer};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn render_scene_digest(scene: &str) -> String {
    let doc = SceneDocument::from_json(scene).expect("scene");
    let composition = doc.into_composition(Path::new("tests/goldens"), &FsImageDecoder);
    let mut renderer =
        Renderer::with_text_renderer(RenderConfig::default(), Box::new(BlockTextRenderer))
            .expect("renderer");
    renderer.render(&composition).expect("render").digest()
}

const SCENE: &str = r#"{
  "lists": [
    { "width": 40, "height": 25, "rows": [
      { "sections": [ { "text": "1" }, { "text": "2" } ] },
      { "sections": [ { "text": "wrapped words in a narrow cell", "font_size": 10 } ] }
    ] },
    { "width": 33, "height": 30, "rows": [
      { "sections": [ {}, { "text": "x" }, { "text": "y" } ] }
    ] }
  ]
}"#;

#[test]
fn golden_digest_matches_fixture() {
    let digest = render_scene_digest(SCENE);

    let expected_path = golden_path("mixed_scene.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, expected.trim());
}

#[test]
fn digest_is_stable_across_renderers() {
    assert_eq!(render_scene_digest(SCENE), render_scene_digest(SCENE));
}
