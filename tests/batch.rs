use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use pattern_textures::{
    BatchConfig, BatchError, BatchOrchestrator, ImageCodec, ImageExt, MAX_RESOLUTION,
    PatternKind, PatternSelector, Texture, TextureCodec, TextureError,
};

/// Deterministic PNG config rooted at `root`.
fn png_config(root: &Path, count: u32, start: u32, resolution: u32) -> BatchConfig {
    let mut cfg = BatchConfig {
        count,
        start,
        resolution,
        output_dir: root.to_path_buf(),
        image_ext: ImageExt::Png,
        seed: Some(2018),
        ..Default::default()
    };
    cfg.perlin.reseed_from_clock = false;
    cfg
}

/// Sorted file names inside `dir`.
fn names_in(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name)
}

/// Codec that writes through to PNG until `fail_at` encodes have happened.
struct FailingCodec {
    fail_at: usize,
    calls: AtomicUsize,
}

impl TextureCodec for FailingCodec {
    fn encode(&self, texture: &Texture, path: &Path) -> image::ImageResult<()> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.fail_at {
            return Err(image::ImageError::IoError(std::io::Error::other("disk full")));
        }
        ImageCodec::new(ImageExt::Png).encode(texture, path)
    }
}

/// Codec that fails for every file whose name starts with `prefix`.
struct FailOn(&'static str);

impl TextureCodec for FailOn {
    fn encode(&self, texture: &Texture, path: &Path) -> image::ImageResult<()> {
        let name = path.file_name().unwrap().to_string_lossy();
        if name.starts_with(self.0) {
            return Err(image::ImageError::IoError(std::io::Error::other("disk full")));
        }
        ImageCodec::new(ImageExt::Png).encode(texture, path)
    }
}

/// Index suffixes of every `<kind>_<index>` stem in `names`.
fn indices_in(names: &BTreeSet<String>) -> BTreeSet<u32> {
    names
        .iter()
        .map(|n| stem(n).rsplit_once('_').unwrap().1.parse().unwrap())
        .collect()
}

#[test]
fn single_flat_texture() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = png_config(dir.path(), 1, 0, 4);
    cfg.pattern = PatternSelector::Only(PatternKind::Flat);

    BatchOrchestrator::new(cfg).run().unwrap();

    let textures = dir.path().join("textures");
    let scripts = dir.path().join("scripts");
    assert_eq!(names_in(&textures), BTreeSet::from(["flat_0.png".to_owned()]));
    assert_eq!(names_in(&scripts), BTreeSet::from(["flat_0.material".to_owned()]));

    let image = image::open(textures.join("flat_0.png")).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (4, 4));
    let first = *image.get_pixel(0, 0);
    assert!(image.pixels().all(|p| *p == first));

    let script = fs::read_to_string(scripts.join("flat_0.material")).unwrap();
    assert!(script.starts_with("material Plugin/flat_0\n"));
    assert!(script.contains("texture Plugin/flat_0.png\n"));
}

#[test]
fn all_kinds_over_an_offset_range() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = png_config(dir.path(), 3, 5, 16);

    let summary = BatchOrchestrator::new(cfg).run().unwrap();
    assert_eq!(summary.textures_written, 12);
    assert_eq!(summary.index_range, Some((5, 7)));

    let images = names_in(&dir.path().join("textures"));
    let scripts = names_in(&dir.path().join("scripts"));
    assert_eq!(images.len(), 12);
    assert_eq!(scripts.len(), 12);

    let mut expected = BTreeSet::new();
    for i in 5..8 {
        for kind in ["flat", "chess", "gradient", "perlin"] {
            expected.insert(format!("{kind}_{i}"));
        }
    }
    let image_stems: BTreeSet<String> = images.iter().map(|n| stem(n).to_owned()).collect();
    let script_stems: BTreeSet<String> = scripts.iter().map(|n| stem(n).to_owned()).collect();
    assert_eq!(image_stems, expected);
    assert_eq!(script_stems, expected);

    for name in &images {
        let decoded = image::open(dir.path().join("textures").join(name))
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.dimensions(), (16, 16), "{name}");
    }
}

#[test]
fn every_script_references_its_image() {
    let dir = tempfile::tempdir().unwrap();
    BatchOrchestrator::new(png_config(dir.path(), 2, 0, 8))
        .run()
        .unwrap();

    let textures = dir.path().join("textures");
    for name in names_in(&dir.path().join("scripts")) {
        let base = stem(&name);
        let script = fs::read_to_string(dir.path().join("scripts").join(&name)).unwrap();
        let image_name = format!("{base}.png");
        assert!(script.contains(&format!("texture Plugin/{image_name}")));
        assert!(textures.join(&image_name).is_file(), "{image_name} missing");
    }
}

#[test]
fn zero_resolution_writes_nothing() {
    for pattern in ["all", "flat", "chess", "gradient", "perlin"] {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        let mut cfg = png_config(&root, 2, 0, 0);
        cfg.pattern = pattern.parse().unwrap();

        let err = BatchOrchestrator::new(cfg).run().unwrap_err();
        assert!(matches!(
            err,
            BatchError::Texture(TextureError::InvalidResolution { resolution: 0 })
        ));
        assert!(!root.exists(), "{pattern}: output created for a rejected batch");
    }
}

#[test]
fn oversize_resolution_is_a_texture_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let cfg = png_config(&root, 1, 0, MAX_RESOLUTION + 1);

    let err = BatchOrchestrator::new(cfg).run().unwrap_err();
    assert!(matches!(
        err,
        BatchError::Texture(TextureError::ResolutionTooLarge { max: MAX_RESOLUTION, .. })
    ));
    assert!(!root.exists());
}

#[test]
fn encode_failure_aborts_without_orphans() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = png_config(dir.path(), 5, 0, 8);
    let codec = FailingCodec {
        fail_at: 6,
        calls: AtomicUsize::new(0),
    };

    let err = BatchOrchestrator::with_codec(cfg, codec).run().unwrap_err();
    match &err {
        BatchError::Encode { path, .. } => {
            assert_eq!(path, &dir.path().join("textures").join("gradient_1.png"));
        }
        other => panic!("expected encode error, got {other:?}"),
    }

    // Index 0 complete, index 1 stopped after flat + chess.
    let expected = BTreeSet::from([
        "flat_0",
        "chess_0",
        "gradient_0",
        "perlin_0",
        "flat_1",
        "chess_1",
    ]);
    let images = names_in(&dir.path().join("textures"));
    let scripts = names_in(&dir.path().join("scripts"));
    let image_stems: BTreeSet<&str> = images.iter().map(|n| stem(n)).collect();
    let script_stems: BTreeSet<&str> = scripts.iter().map(|n| stem(n)).collect();
    assert_eq!(image_stems, expected);
    assert_eq!(script_stems, expected);
}

#[test]
fn rerun_overwrites_scripts_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let scripts: PathBuf = dir.path().join("scripts");
    fs::create_dir_all(&scripts).unwrap();
    fs::write(scripts.join("perlin_0.material"), "junk\n".repeat(100)).unwrap();

    let mut cfg = png_config(dir.path(), 1, 0, 8);
    cfg.pattern = PatternSelector::Only(PatternKind::Perlin);
    BatchOrchestrator::new(cfg).run().unwrap();

    let script = fs::read_to_string(scripts.join("perlin_0.material")).unwrap();
    assert!(!script.contains("junk"));
    assert!(script.ends_with("}\n"));
}

#[test]
fn parallel_batches_are_reproducible() {
    let render = |threads: usize| {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = png_config(dir.path(), 6, 2, 12);
        cfg.threads = threads;
        BatchOrchestrator::new(cfg).run().unwrap();

        let textures = dir.path().join("textures");
        names_in(&textures)
            .into_iter()
            .map(|name| {
                let bytes = image::open(textures.join(&name)).unwrap().to_rgb8().into_raw();
                (name, bytes)
            })
            .collect::<Vec<_>>()
    };

    let two = render(2);
    let four = render(4);
    assert_eq!(two.len(), 24);
    assert_eq!(two, four);
}

#[test]
fn seeded_sequential_runs_match() {
    let render = || {
        let dir = tempfile::tempdir().unwrap();
        BatchOrchestrator::new(png_config(dir.path(), 2, 0, 10))
            .run()
            .unwrap();
        let textures = dir.path().join("textures");
        names_in(&textures)
            .into_iter()
            .map(|name| image::open(textures.join(name)).unwrap().to_rgb8().into_raw())
            .collect::<Vec<_>>()
    };
    assert_eq!(render(), render());
}

#[test]
fn failed_rerun_removes_stale_script() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = png_config(dir.path(), 1, 0, 8);
    cfg.pattern = PatternSelector::Only(PatternKind::Flat);
    BatchOrchestrator::new(cfg.clone()).run().unwrap();

    let image = dir.path().join("textures").join("flat_0.png");
    let script = dir.path().join("scripts").join("flat_0.material");
    assert!(image.is_file() && script.is_file());

    let err = BatchOrchestrator::with_codec(cfg, FailOn("flat_0"))
        .run()
        .unwrap_err();
    assert!(matches!(err, BatchError::Encode { .. }));
    assert!(!image.exists());
    assert!(!script.exists());
}

#[test]
fn script_write_failure_rolls_back_image() {
    let dir = tempfile::tempdir().unwrap();
    let scripts = dir.path().join("scripts");
    // A directory in the script's place makes the write fail.
    fs::create_dir_all(scripts.join("flat_0.material")).unwrap();

    let mut cfg = png_config(dir.path(), 1, 0, 8);
    cfg.pattern = PatternSelector::Only(PatternKind::Flat);
    let err = BatchOrchestrator::new(cfg).run().unwrap_err();

    match &err {
        BatchError::DescriptorWrite { path, .. } => {
            assert_eq!(path, &scripts.join("flat_0.material"));
        }
        other => panic!("expected descriptor write error, got {other:?}"),
    }
    assert!(names_in(&dir.path().join("textures")).is_empty());
}

#[test]
fn parallel_abort_leaves_contiguous_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = png_config(dir.path(), 64, 0, 4);
    cfg.threads = 4;

    let err = BatchOrchestrator::with_codec(cfg, FailOn("perlin_1."))
        .run()
        .unwrap_err();
    match &err {
        BatchError::Encode { path, .. } => {
            assert_eq!(path, &dir.path().join("textures").join("perlin_1.png"));
        }
        other => panic!("expected encode error, got {other:?}"),
    }

    let images = names_in(&dir.path().join("textures"));
    let scripts = names_in(&dir.path().join("scripts"));
    assert_eq!(indices_in(&images), BTreeSet::from([0, 1]));

    // Index 0 complete, index 1 stopped at perlin.
    let expected = BTreeSet::from([
        "flat_0",
        "chess_0",
        "gradient_0",
        "perlin_0",
        "flat_1",
        "chess_1",
        "gradient_1",
    ]);
    let image_stems: BTreeSet<&str> = images.iter().map(|n| stem(n)).collect();
    let script_stems: BTreeSet<&str> = scripts.iter().map(|n| stem(n)).collect();
    assert_eq!(image_stems, expected);
    assert_eq!(script_stems, expected);
}
