//! Property tests over random well-formed decompositions.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use mesh_partition_index::prelude::*;

/// Random layout for rank 0 of 3: a random visible subset of a
/// `global`-cell layer, cut into `inner_depth + 1 + halo_depth + 1` zones.
fn random_layout(global: u64, inner_depth: usize, halo_depth: usize, seed: u64) -> PartitionLayout {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut ids: Vec<u64> = (1..=global).collect();
    ids.shuffle(&mut rng);
    let visible = rng.gen_range(0..=ids.len());
    ids.truncate(visible);

    let n_zones = inner_depth + halo_depth + 2;
    let mut cuts: Vec<usize> = (0..n_zones - 1).map(|_| rng.gen_range(0..=visible)).collect();
    cuts.push(0);
    cuts.push(visible);
    cuts.sort_unstable();

    // lengths in layout order: inner[inner_depth]..inner[1], edge, halo[1].., ghost
    let lens: Vec<usize> = cuts.windows(2).map(|w| w[1] - w[0]).collect();
    let mut cell_ids = Vec::with_capacity(visible);
    for w in cuts.windows(2) {
        let mut seg = ids[w[0]..w[1]].to_vec();
        seg.sort_unstable();
        cell_ids.extend(seg);
    }

    let owned: usize = lens[..=inner_depth].iter().sum();
    let mut cell_owner = vec![0usize; owned];
    cell_owner.extend((owned..visible).map(|_| rng.gen_range(1..3)));

    let mut num_inner = vec![0; inner_depth];
    let mut last_inner = vec![0; inner_depth];
    let mut end = 0;
    for (i, &len) in lens[..inner_depth].iter().enumerate() {
        let depth = inner_depth - i;
        end += len;
        num_inner[depth - 1] = len;
        last_inner[depth - 1] = end;
    }
    let num_edge = lens[inner_depth];
    end += num_edge;
    let last_edge = end;
    let mut num_halo = Vec::with_capacity(halo_depth);
    let mut last_halo = Vec::with_capacity(halo_depth);
    for &len in &lens[inner_depth + 1..inner_depth + 1 + halo_depth] {
        end += len;
        num_halo.push(len);
        last_halo.push(end);
    }
    let num_ghost = lens[n_zones - 1];

    PartitionLayout {
        local_rank: 0,
        total_ranks: 3,
        global_num_cells: global,
        cell_ids,
        cell_owner,
        num_inner,
        last_inner,
        num_edge,
        last_edge,
        num_halo,
        last_halo,
        num_ghost,
    }
}

fn layout_strategy() -> impl Strategy<Value = PartitionLayout> {
    (1u64..80, 0usize..4, 0usize..4, any::<u64>())
        .prop_map(|(g, i, h, seed)| random_layout(g, i, h, seed))
}

proptest! {
    #[test]
    fn random_layouts_pass_validation(layout in layout_strategy()) {
        match PartitionIndex::with_options(layout, ValidationOptions::all()) {
            Ok(p) => {
                prop_assert_eq!(p.validate_invariants(), Ok(()));
            }
            Err(e) => {
                prop_assert!(false, "rejected: {}", e);
            }
        }
    }

    #[test]
    fn bottom_layer_round_trip(layout in layout_strategy()) {
        let p = PartitionIndex::with_options(layout, ValidationOptions::all()).unwrap();
        for local in 1..=p.len() {
            let gid = p.global_from_local(local).unwrap();
            prop_assert_eq!(p.local_from_global(gid), Some(local));
        }
    }

    #[test]
    fn ghost_free_layers_round_trip(layout in layout_strategy(), layer in 1usize..4) {
        let p = PartitionIndex::with_options(layout, ValidationOptions::all()).unwrap();
        prop_assume!(p.ghost_count() == 0);
        for slice in 1..=p.len() {
            let local = slice + layer * p.len();
            let gid = p.global_from_local(local).unwrap();
            prop_assert_eq!(p.local_from_global(gid), Some(local));
        }
    }

    #[test]
    fn ghosted_layers_use_the_shorter_stride(layout in layout_strategy(), layer in 1usize..4) {
        let p = PartitionIndex::with_options(layout, ValidationOptions::all()).unwrap();
        prop_assume!(p.ghost_count() > 0);
        for slice in 1..=p.len() {
            let local = slice + layer * p.len();
            let gid = p.global_from_local(local).unwrap();
            prop_assert_eq!(
                p.local_from_global(gid),
                Some(slice + layer * p.total_cells_in_layer())
            );
        }
    }

    #[test]
    fn zone_partition(layout in layout_strategy()) {
        let p = PartitionIndex::with_options(layout, ValidationOptions::all()).unwrap();
        let inner: usize = (1..=p.inner_depth()).map(|d| p.inner_count(d)).sum();
        let halo: usize = (1..=p.halo_depth()).map(|d| p.halo_count(d)).sum();
        prop_assert_eq!(p.total_cells_in_layer(), p.edge_count() + inner + halo);
        let segments: usize = p.zones().map(|z| p.segment(z).unwrap().len()).sum();
        prop_assert_eq!(segments, p.total_cells_in_layer() + p.ghost_count());
        prop_assert_eq!(segments, p.len());
    }

    #[test]
    fn segments_strictly_ascending(layout in layout_strategy()) {
        let p = PartitionIndex::with_options(layout, ValidationOptions::all()).unwrap();
        for zone in p.zones() {
            let seg = p.segment(zone).unwrap();
            prop_assert!(seg.windows(2).all(|w| w[0] < w[1]), "zone {}", zone);
        }
    }

    #[test]
    fn depth_past_the_end_is_zero(layout in layout_strategy()) {
        let p = PartitionIndex::with_options(layout, ValidationOptions::all()).unwrap();
        prop_assert_eq!(p.inner_count(p.inner_depth() + 1), 0);
        prop_assert_eq!(p.halo_count(p.halo_depth() + 1), 0);
        prop_assert_eq!(p.inner_last(p.inner_depth() + 1), 0);
        prop_assert_eq!(p.halo_last(p.halo_depth() + 1), 0);
    }

    #[test]
    fn invisible_cells_are_not_found(layout in layout_strategy()) {
        let p = PartitionIndex::with_options(layout, ValidationOptions::all()).unwrap();
        for gid in 1..=p.global_num_cells() {
            let visible = p.cell_ids().contains(&gid);
            prop_assert_eq!(p.local_from_global(gid).is_some(), visible);
        }
    }

    #[test]
    fn owners_follow_zones(layout in layout_strategy()) {
        let p = PartitionIndex::with_options(layout, ValidationOptions::all()).unwrap();
        for local in 1..=p.len() {
            let owner = p.owner_of(local).unwrap();
            let zone = p.zone_of(local).unwrap();
            prop_assert_eq!(owner == p.local_rank(), zone.is_owned());
        }
        prop_assert!(p.owner_of(p.len() + 1).is_err());
    }

    #[test]
    fn swapped_segment_is_rejected(layout in layout_strategy()) {
        let p = PartitionIndex::with_options(layout.clone(), ValidationOptions::all()).unwrap();
        let zone = p.zones().find(|&z| p.segment(z).unwrap().len() >= 2);
        prop_assume!(zone.is_some());
        let zone = zone.unwrap();
        let range = p.segment_range(zone).unwrap();
        let mut bad = layout;
        bad.cell_ids.swap(range.start, range.start + 1);
        let err = PartitionIndex::with_options(bad, ValidationOptions::all()).unwrap_err();
        prop_assert_eq!(
            err,
            PartitionIndexError::MalformedInput(LayoutError::UnsortedSegment {
                zone,
                position: range.start + 2,
            })
        );
    }

    #[test]
    fn copy_is_independent(a in layout_strategy(), b in layout_strategy()) {
        let src = PartitionIndex::with_options(a, ValidationOptions::all()).unwrap();
        let mut dst = PartitionIndex::with_options(b, ValidationOptions::all()).unwrap();
        dst.copy_from(&src);
        prop_assert_eq!(&dst, &src);
        let original = src.clone();

        // rebuild the source from a mutated record; the copy must not move
        let mut mutated = src.into_layout();
        if let Some(first) = mutated.cell_ids.first_mut() {
            *first = u64::MAX;
        }
        let src = PartitionIndex::with_options(mutated, ValidationOptions::none()).unwrap();
        prop_assert_eq!(&dst, &original);
        if !src.is_empty() {
            prop_assert_ne!(dst.cell_ids()[0], src.cell_ids()[0]);
        }
    }
}
