use level_gen::{
    GenerationContext, GenerationError, GeneratorAssets, GeneratorConfig, LevelGenerator,
    LevelResult, PrefabLibrary, SectionType, SizePreset, StylePreset, TileArchetype, TileType,
};
use level_gen::phases::generate_paths;
use proptest::prelude::*;
use wfc_rules::formats::{FormatParser, GridTextParser};
use wfc_rules::{train_model, Direction};

fn builtin_generator() -> LevelGenerator {
    LevelGenerator::new(GeneratorAssets::builtin().unwrap(), GeneratorConfig::default())
}

fn assert_legal(result: &LevelResult) {
    for ((row, col), ty) in result.type_grid.iter_cells() {
        let archetype = *result.archetype_grid.get(row, col).unwrap();
        assert!(
            archetype.legal_types().contains(ty),
            "({row}, {col}): {ty:?} is not legal for {archetype:?}"
        );
    }
}

fn assert_valid_path(path: &[usize], grid_rows: usize, grid_cols: usize) {
    assert!(path.len() >= grid_rows, "path {path:?} is too short to cross the grid");
    assert!(path[0] < grid_cols, "path starts outside the top row: {path:?}");
    let last = *path.last().unwrap();
    assert_eq!(last / grid_cols, grid_rows - 1, "path ends outside the bottom row: {path:?}");

    let mut seen = std::collections::HashSet::new();
    for &id in path {
        assert!(seen.insert(id), "section {id} visited twice: {path:?}");
    }
    for pair in path.windows(2) {
        let (a, b) = ((pair[0] / grid_cols, pair[0] % grid_cols), (pair[1] / grid_cols, pair[1] % grid_cols));
        assert_eq!(a.0.abs_diff(b.0) + a.1.abs_diff(b.1), 1, "{} and {} are not adjacent", pair[0], pair[1]);
    }
}

#[test]
fn generation_is_deterministic() {
    let mut generator = builtin_generator();
    let first = generator
        .generate_level(42, SizePreset::Small, StylePreset::Grass)
        .unwrap();
    let second = generator
        .generate_level(42, SizePreset::Small, StylePreset::Grass)
        .unwrap();
    assert_eq!(first, second);

    let other = generator
        .generate_level(43, SizePreset::Small, StylePreset::Grass)
        .unwrap();
    assert_ne!(first.type_grid, other.type_grid);
}

#[test]
fn seed_one_small_scenario() {
    let mut generator = builtin_generator();
    let result = generator
        .generate_level(1, SizePreset::Small, StylePreset::General)
        .unwrap();

    assert_eq!((result.type_grid.rows(), result.type_grid.cols()), (32, 40));
    assert!((0..=3).contains(&result.section_path[0]));
    assert!((12..=15).contains(result.section_path.last().unwrap()));
    assert_eq!(result.start_section, result.section_path[0]);
    assert_eq!(result.end_section, *result.section_path.last().unwrap());

    let (sr, sc) = result.start_tile;
    let (er, ec) = result.end_tile;
    assert_eq!(result.type_grid.get(sr, sc), Some(&TileType::House));
    assert_eq!(result.type_grid.get(er, ec), Some(&TileType::Flag));
    assert_valid_path(&result.section_path, 4, 4);
}

#[test]
fn every_final_cell_is_legal() {
    let mut generator = builtin_generator();
    for (seed, size, style) in [
        (3, SizePreset::Small, StylePreset::Cave),
        (7, SizePreset::Small, StylePreset::Dungeon),
        (11, SizePreset::Medium, StylePreset::General),
    ] {
        let result = generator.generate_level(seed, size, style).unwrap();
        assert_legal(&result);
        assert_eq!(result.special_report.fallbacks, 0, "seed {seed} fell back");
        let houses = result
            .type_grid
            .iter_cells()
            .filter(|(_, &t)| t == TileType::House)
            .count();
        assert_eq!(houses, 1);
    }
}

#[test]
fn sections_leave_only_wildcards_open() {
    let result = builtin_generator()
        .generate_level(5, SizePreset::Small, StylePreset::Cave)
        .unwrap();
    assert!(result
        .assembled_grid
        .iter_cells()
        .all(|(_, &a)| a != TileArchetype::None));
    assert!(result
        .archetype_grid
        .iter_cells()
        .all(|(_, &a)| a != TileArchetype::None && a != TileArchetype::Wildcard));
    // The collapse only ever rewrites wildcard cells.
    for ((row, col), &before) in result.assembled_grid.iter_cells() {
        if before != TileArchetype::Wildcard {
            assert_eq!(result.archetype_grid.get(row, col), Some(&before));
        }
    }
}

#[test]
fn stamped_sections_match_their_prefabs() {
    let generator = builtin_generator();
    let result = generator
        .change_preset(21, 22, StylePreset::Grass)
        .unwrap();
    let dims = result.dimensions;
    assert_eq!(result.placements.len(), dims.num_sections());

    for placement in &result.placements {
        let section_type = *result
            .section_grid
            .get(
                placement.section / dims.section_grid_cols,
                placement.section % dims.section_grid_cols,
            )
            .unwrap();
        let prefab = &generator.assets().prefabs.prefabs(section_type)[placement.prefab];
        let expected = if placement.mirrored {
            prefab.mirrored()
        } else {
            prefab.clone()
        };
        let origin_row = placement.section / dims.section_grid_cols * dims.section_rows;
        let origin_col = placement.section % dims.section_grid_cols * dims.section_cols;

        for ((r, c), &cell) in expected.iter_cells() {
            let stamped = *result
                .assembled_grid
                .get(origin_row + r, origin_col + c)
                .unwrap();
            let wanted = match cell {
                TileArchetype::Start if placement.section == result.start_section => {
                    TileArchetype::Start
                }
                TileArchetype::Start if placement.section == result.end_section => {
                    TileArchetype::End
                }
                TileArchetype::Start => TileArchetype::Air,
                other => other,
            };
            assert_eq!(stamped, wanted, "section {} cell ({r}, {c})", placement.section);
        }
    }
}

#[test]
fn change_preset_keeps_the_skeleton() {
    let mut generator = builtin_generator();
    let original = generator
        .generate_level(9, SizePreset::Small, StylePreset::Cave)
        .unwrap();
    let restyled = generator.change_preset(9, 1234, StylePreset::Dungeon).unwrap();

    assert_eq!(restyled.section_path, original.section_path);
    assert_eq!(restyled.section_grid, original.section_grid);
    assert_eq!(restyled.assembled_grid, original.assembled_grid);
    assert_eq!(restyled.placements, original.placements);
    assert_eq!(restyled.start_tile, original.start_tile);
    assert_eq!(restyled.style, StylePreset::Dungeon);
    assert_legal(&restyled);

    // Same style seed, same restyle.
    assert_eq!(
        generator.change_preset(9, 1234, StylePreset::Dungeon).unwrap(),
        restyled
    );
}

#[test]
fn ground_never_touches_trap_when_the_corpus_never_shows_it() {
    let prefab = "\
0000000000
0*0*0*0*0S
**********
1111111111
0*0*0*0*00
**********
1111111111
1111111111";
    let corpus = "\
000000000
020002000
000000000
011111110
000000000
0@00!00S0
000000000
0X0000000
000000000";

    let builtin = GeneratorAssets::builtin().unwrap();
    let mut prefabs = PrefabLibrary::default();
    for section_type in SectionType::ALL {
        prefabs.add_text(section_type, prefab).unwrap();
    }
    let grids = GridTextParser::<TileArchetype>::new().parse(corpus).unwrap();
    let assets = GeneratorAssets {
        prefabs,
        archetype_model: train_model(&grids),
        style_models: builtin.style_models,
    };
    let mut generator = LevelGenerator::new(assets, GeneratorConfig::default());

    let mut traps = 0;
    for seed in 0..6 {
        let result = generator
            .generate_level(seed, SizePreset::Small, StylePreset::General)
            .unwrap();
        assert_eq!(result.special_report.fallbacks, 0);
        let grid = &result.archetype_grid;
        for ((row, col), &cell) in grid.iter_cells() {
            if cell != TileArchetype::Ground {
                continue;
            }
            for direction in Direction::CARDINAL {
                assert_ne!(
                    grid.neighbor_value(row, col, direction),
                    Some(&TileArchetype::Trap),
                    "seed {seed}: ground at ({row}, {col}) has a trap {direction:?}"
                );
            }
        }
        traps += grid
            .iter_cells()
            .filter(|(_, &a)| a == TileArchetype::Trap)
            .count();
    }
    assert!(traps > 0, "the corpus should still produce some traps");
}

#[test]
fn malformed_prefab_is_rejected_before_generation() {
    let dir = tempfile::tempdir().unwrap();
    let prefabs = dir.path().join("prefabs");
    std::fs::create_dir_all(&prefabs).unwrap();
    std::fs::write(prefabs.join("normal.txt"), "S00\n111\n").unwrap();

    match GeneratorAssets::from_dir(dir.path()) {
        Err(GenerationError::InvalidPrefab(msg)) => {
            assert!(msg.contains("normal.txt"), "{msg}");
            assert!(msg.contains("expected 8x10"), "{msg}");
        }
        other => panic!("Expected InvalidPrefab, got {other:?}"),
    }

    std::fs::write(prefabs.join("normal.txt"), "S0?\n111\n").unwrap();
    assert!(matches!(
        GeneratorAssets::from_dir(dir.path()),
        Err(GenerationError::Load(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn paths_are_valid_for_any_seed(seed in any::<u64>(), size_index in 0usize..4) {
        let size = SizePreset::ALL[size_index];
        let dims = size.dimensions();
        let mut ctx = GenerationContext::new(dims, seed);
        generate_paths(&mut ctx, &GeneratorConfig::default()).unwrap();
        assert_valid_path(&ctx.path, dims.section_grid_rows, dims.section_grid_cols);
        prop_assert!(ctx
            .section_grid
            .iter_cells()
            .all(|(_, &t)| t != SectionType::None));
    }
}
