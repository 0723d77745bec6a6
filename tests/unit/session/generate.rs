use super::*;
use crate::raster::mask::MaskFormat;

fn library() -> SpriteLibrary {
    let mut lib = SpriteLibrary::new();
    let cell = lib.add_label("cell").unwrap();
    let vessel = lib.add_label("vessel").unwrap();
    for (i, size) in [6u32, 8, 10].into_iter().enumerate() {
        let shade = 40 * (i as u8 + 1);
        lib.add_sprite(Sprite::solid(size, size, [shade, 10, 10]).unwrap(), cell)
            .unwrap();
        lib.add_sprite(Sprite::solid(size, size / 2, [10, shade, 10]).unwrap(), vessel)
            .unwrap();
    }
    lib
}

fn config() -> GenerateConfig {
    GenerateConfig {
        width: 96,
        height: 96,
        min_sprites: 12,
        max_sprites: 12,
        patience: 300,
        ..GenerateConfig::default()
    }
}

#[test]
fn counts_add_up_and_instance_colors_match_placements() {
    let lib = library();
    let cfg = GenerateConfig {
        format: MaskFormat::Instance,
        ..config()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let out = generate(&lib, &cfg, &mut rng).unwrap();

    assert_eq!(out.attempted, 12);
    assert_eq!(out.placed + out.dropped, 12);
    assert!(out.placed >= 1);
    assert_eq!(out.collage.colors().len(), out.placed as usize);

    let legend = out.legend(&lib);
    assert_eq!(legend.labels.len(), 2);
    assert_eq!(legend.instances.len(), out.placed as usize);
    for entry in &legend.instances {
        assert!(!entry.color.is_zero());
        assert!(legend.labels.values().any(|l| *l == entry.label));
    }
}

#[test]
fn pixel_mask_only_holds_known_labels() {
    let lib = library();
    let mut rng = StdRng::seed_from_u64(8);
    let out = generate(&lib, &config(), &mut rng).unwrap();
    assert!(out.collage.mask().label_plane().iter().all(|&v| v <= 2));
    assert!(out.collage.colors().is_empty());
}

#[test]
fn same_seed_same_collage() {
    let lib = library();
    let a = generate(&lib, &config(), &mut StdRng::seed_from_u64(1)).unwrap();
    let b = generate(&lib, &config(), &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(a.collage, b.collage);
}

#[test]
fn batch_is_ordered_and_reproducible_per_index() {
    let lib = library();
    let cfg = GenerateConfig {
        seed: 100,
        collages: 3,
        threads: Some(2),
        ..config()
    };
    let batch = generate_batch(&lib, &cfg).unwrap();
    assert_eq!(batch.iter().map(|g| g.index).collect::<Vec<_>>(), vec![0, 1, 2]);

    let single = generate(&lib, &cfg, &mut StdRng::seed_from_u64(102)).unwrap();
    assert_eq!(batch[2].collage, single.collage);
}

#[test]
fn shared_registry_keeps_colors_unique_across_collages() {
    let lib = library();
    let cfg = GenerateConfig {
        format: MaskFormat::Instance,
        ..config()
    };
    let mut rng = StdRng::seed_from_u64(4);
    let first = generate(&lib, &cfg, &mut rng).unwrap();
    let carried = first.collage.colors().clone();
    let second = generate_with_colors(&lib, &cfg, carried, &mut rng).unwrap();
    assert_eq!(
        second.collage.colors().len(),
        (first.placed + second.placed) as usize
    );
}

#[test]
fn empty_library_and_oversized_sprites_are_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = generate(&SpriteLibrary::new(), &config(), &mut rng).unwrap_err();
    assert!(matches!(err, CollageError::Validation(_)));

    let mut lib = SpriteLibrary::new();
    let big = lib.add_label("big").unwrap();
    lib.add_sprite(Sprite::solid(90, 10, [1, 1, 1]).unwrap(), big)
        .unwrap();
    let err = generate(&lib, &config(), &mut rng).unwrap_err();
    assert!(matches!(err, CollageError::Geometry(_)));
}

#[test]
fn least_used_sprites_are_picked_first() {
    let mut lib = SpriteLibrary::new();
    let only = lib.add_label("only").unwrap();
    for shade in [1u8, 2, 3] {
        lib.add_sprite(Sprite::solid(2, 2, [shade, 0, 0]).unwrap(), only)
            .unwrap();
    }
    let mut usage = Usage::new(&lib);
    let mut rng = StdRng::seed_from_u64(6);
    let mut shades: Vec<u8> = (0..3)
        .map(|_| usage.pick(&lib, &[only], &mut rng).1.pixel(0, 0)[0])
        .collect();
    shades.sort_unstable();
    assert_eq!(shades, vec![1, 2, 3]);
}
