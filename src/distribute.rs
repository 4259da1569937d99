//! Concept-to-level distribution.
//!
//! Spreads a pool of concept cards over the ordered levels in four passes:
//!   1. spiral seeding of high-importance items (never evicted later)
//!   2. tier striping of everything else over each tier's level slices,
//!      spilling into neighbouring levels when a level is full
//!   3. topping up levels that sit under the band minimum
//!   4. a final sweep that places any item still in no level
//!
//! Only coverage is guaranteed. Band shortfalls are reported, not treated as errors.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::domain::{ConceptItem, Difficulty, Importance};
use crate::error::DistributeError;

/// Inclusive range of levels, written `[start, end]` in config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct LevelRange {
    pub start: u32,
    pub end: u32,
}

impl LevelRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, level: u32) -> bool {
        self.start <= level && level <= self.end
    }

    fn span(&self) -> u32 {
        self.end - self.start + 1
    }
}

impl From<[u32; 2]> for LevelRange {
    fn from([start, end]: [u32; 2]) -> Self {
        Self { start, end }
    }
}

impl From<LevelRange> for [u32; 2] {
    fn from(r: LevelRange) -> Self {
        [r.start, r.end]
    }
}

/// Acceptable inclusive number of items per level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBand {
    pub min: usize,
    pub max: usize,
}

impl TargetBand {
    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }
}

/// Share of a tier's remaining items striped over `range`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierSlice {
    pub share: f64,
    pub range: LevelRange,
}

/// One value per difficulty tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub beginner: T,
    pub intermediate: T,
    pub advanced: T,
    pub expert: T,
}

impl<T> TierTable<T> {
    pub fn get(&self, tier: Difficulty) -> &T {
        match tier {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Intermediate => &self.intermediate,
            Difficulty::Advanced => &self.advanced,
            Difficulty::Expert => &self.expert,
        }
    }
}

/// Tunable placement constants. Defaults reproduce the 40-level curriculum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionPolicy {
    pub level_count: u32,
    pub band: TargetBand,
    /// Spiral placements kept even when a spiral level is already full.
    pub min_spiral_occurrences: usize,
    /// Duplicates used to top up a short level may come from any tier, not only
    /// tiers whose slices cover that level.
    pub balance_across_tiers: bool,
    pub spiral: TierTable<Vec<u32>>,
    pub tiers: TierTable<Vec<TierSlice>>,
}

impl Default for DistributionPolicy {
    fn default() -> Self {
        let whole = |start, end| vec![TierSlice { share: 1.0, range: LevelRange::new(start, end) }];
        Self {
            level_count: 40,
            band: TargetBand { min: 10, max: 18 },
            min_spiral_occurrences: 3,
            balance_across_tiers: false,
            spiral: TierTable {
                beginner: vec![3, 8, 13, 18],
                intermediate: vec![3, 8, 13, 18],
                advanced: vec![13, 18, 23, 28],
                expert: vec![23, 28, 33, 38],
            },
            tiers: TierTable {
                beginner: whole(1, 10),
                // most of the bank is intermediate, so it is spread over three ranges
                intermediate: vec![
                    TierSlice { share: 0.3, range: LevelRange::new(1, 10) },
                    TierSlice { share: 0.4, range: LevelRange::new(11, 20) },
                    TierSlice { share: 0.3, range: LevelRange::new(21, 30) },
                ],
                advanced: whole(21, 35),
                expert: whole(31, 40),
            },
        }
    }
}

impl DistributionPolicy {
    pub fn validate(&self) -> Result<(), DistributeError> {
        let bad = |msg: String| Err(DistributeError::InvalidPolicy(msg));

        if self.level_count == 0 {
            return bad("level_count must be at least 1".into());
        }
        if self.band.min > self.band.max {
            return bad(format!("band min {} exceeds band max {}", self.band.min, self.band.max));
        }
        if self.band.max == 0 {
            return bad("band max must be at least 1".into());
        }
        if self.min_spiral_occurrences == 0 {
            return bad("min_spiral_occurrences must be at least 1".into());
        }

        for tier in Difficulty::ALL {
            let name = tier.as_str();

            let spiral = self.spiral.get(tier);
            if spiral.is_empty() {
                return bad(format!("{name}: spiral levels are empty"));
            }
            let mut seen = HashSet::new();
            for &level in spiral {
                if level == 0 || level > self.level_count {
                    return bad(format!("{name}: spiral level {level} outside 1..={}", self.level_count));
                }
                if !seen.insert(level) {
                    return bad(format!("{name}: spiral level {level} listed twice"));
                }
            }

            let slices = self.tiers.get(tier);
            if slices.is_empty() {
                return bad(format!("{name}: no level slices"));
            }
            let mut total = 0.0;
            for s in slices {
                if !s.share.is_finite() || s.share < 0.0 {
                    return bad(format!("{name}: share {} is not a non-negative number", s.share));
                }
                if s.range.start == 0 || s.range.start > s.range.end || s.range.end > self.level_count {
                    return bad(format!(
                        "{name}: range [{}, {}] is not within 1..={}",
                        s.range.start, s.range.end, self.level_count
                    ));
                }
                total += s.share;
            }
            if (total - 1.0).abs() > 1e-6 {
                return bad(format!("{name}: slice shares sum to {total}, expected 1"));
            }
        }
        Ok(())
    }

    fn tier_covers(&self, tier: Difficulty, level: u32) -> bool {
        self.tiers.get(tier).iter().any(|s| s.range.contains(level))
    }
}

/// Level number -> concept ids, for every level `1..=level_count`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAssignment {
    pub levels: BTreeMap<u32, Vec<String>>,
}

#[allow(dead_code)]
impl LevelAssignment {
    pub fn empty(level_count: u32) -> Self {
        Self { levels: (1..=level_count).map(|l| (l, Vec::new())).collect() }
    }

    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn items_at(&self, level: u32) -> Option<&[String]> {
        self.levels.get(&level).map(Vec::as_slice)
    }

    pub fn count(&self, level: u32) -> usize {
        self.levels.get(&level).map_or(0, Vec::len)
    }

    pub fn levels_of(&self, item_id: &str) -> Vec<u32> {
        self.levels
            .iter()
            .filter(|(_, ids)| ids.iter().any(|id| id == item_id))
            .map(|(level, _)| *level)
            .collect()
    }

    pub fn covered_ids(&self) -> HashSet<&str> {
        self.levels.values().flatten().map(String::as_str).collect()
    }
}

/// A level the balancing pass could not lift to the band minimum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LevelShortfall {
    pub level: u32,
    pub count: usize,
    pub missing: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct Distribution {
    pub assignment: LevelAssignment,
    pub shortfalls: Vec<LevelShortfall>,
    pub overfull_levels: Vec<u32>,
    /// Striped items that landed outside their slice's target level.
    pub spilled_items: usize,
    /// Items only placed by the final coverage sweep.
    pub late_covered_items: usize,
}

/// Per-level membership while the passes run. Levels are 1-based, items are pool indices.
struct Buckets {
    members: Vec<Vec<usize>>,
    seen: Vec<HashSet<usize>>,
    placements: Vec<usize>,
}

impl Buckets {
    fn new(level_count: u32, item_count: usize) -> Self {
        Self {
            members: vec![Vec::new(); level_count as usize],
            seen: vec![HashSet::new(); level_count as usize],
            placements: vec![0; item_count],
        }
    }

    fn count(&self, level: u32) -> usize {
        self.members[level as usize - 1].len()
    }

    fn contains(&self, level: u32, item: usize) -> bool {
        self.seen[level as usize - 1].contains(&item)
    }

    fn place(&mut self, level: u32, item: usize) -> bool {
        let slot = level as usize - 1;
        if !self.seen[slot].insert(item) {
            return false;
        }
        self.members[slot].push(item);
        self.placements[item] += 1;
        true
    }

    /// First level with room: the rest of `range` from `target` (wrapping), then
    /// outward from its edges.
    fn find_spill(&self, target: u32, range: LevelRange, max: usize, level_count: u32) -> Option<u32> {
        let span = range.span();
        for step in 0..span {
            let level = range.start + (target - range.start + step) % span;
            if self.count(level) < max {
                return Some(level);
            }
        }
        for d in 1..level_count {
            let below = (range.start > d).then(|| range.start - d);
            let above = (range.end + d <= level_count).then(|| range.end + d);
            if below.is_none() && above.is_none() {
                break;
            }
            if let Some(level) = [below, above].into_iter().flatten().find(|&l| self.count(l) < max) {
                return Some(level);
            }
        }
        None
    }

    fn into_assignment(self, items: &[ConceptItem]) -> LevelAssignment {
        LevelAssignment {
            levels: self
                .members
                .into_iter()
                .enumerate()
                .map(|(slot, idxs)| (slot as u32 + 1, idxs.into_iter().map(|i| items[i].id.clone()).collect()))
                .collect(),
        }
    }
}

/// Assign every concept to one or more levels under `policy`.
#[instrument(level = "info", skip_all, fields(items = items.len(), level_count = policy.level_count))]
pub fn distribute(items: &[ConceptItem], policy: &DistributionPolicy) -> Result<Distribution, DistributeError> {
    policy.validate()?;

    let mut ids = HashSet::with_capacity(items.len());
    for item in items {
        if !ids.insert(item.id.as_str()) {
            return Err(DistributeError::DuplicateItemId(item.id.clone()));
        }
    }

    if items.is_empty() {
        info!(target: "concepts", "Empty concept pool; returning empty assignment");
        return Ok(Distribution {
            assignment: LevelAssignment::empty(policy.level_count),
            shortfalls: Vec::new(),
            overfull_levels: Vec::new(),
            spilled_items: 0,
            late_covered_items: 0,
        });
    }

    let band = policy.band;
    let mut buckets = Buckets::new(policy.level_count, items.len());
    let is_spiral: Vec<bool> = items.iter().map(|i| i.importance == Importance::High).collect();

    // 1) spiral seeding
    let mut skipped_spiral = 0usize;
    for (idx, item) in items.iter().enumerate().filter(|(i, _)| is_spiral[*i]) {
        let levels = policy.spiral.get(item.difficulty);
        let floor = policy.min_spiral_occurrences.min(levels.len());
        let mut placed = 0usize;
        for (k, &level) in levels.iter().enumerate() {
            let remaining_after = levels.len() - k - 1;
            let required = placed + remaining_after < floor;
            if buckets.count(level) < band.max || required {
                if buckets.place(level, idx) {
                    placed += 1;
                }
            } else {
                skipped_spiral += 1;
            }
        }
    }
    debug!(target: "concepts", spiral_items = is_spiral.iter().filter(|s| **s).count(), skipped_spiral, "Spiral seeding done");

    // 2) tier striping
    let mut spilled_items = 0usize;
    for tier in Difficulty::ALL {
        let group: Vec<usize> = (0..items.len())
            .filter(|&i| items[i].difficulty == tier && !is_spiral[i] && buckets.placements[i] == 0)
            .collect();
        if group.is_empty() {
            continue;
        }
        let slices = policy.tiers.get(tier);
        let n = group.len();
        let mut cumulative = 0.0;
        let mut from = 0usize;
        for (k, slice) in slices.iter().enumerate() {
            cumulative += slice.share;
            let to = if k + 1 == slices.len() {
                n
            } else {
                (((n as f64) * cumulative + 1e-9).floor() as usize).clamp(from, n)
            };
            spilled_items += stripe(&mut buckets, &group[from..to], slice.range, policy);
            from = to;
        }
        debug!(target: "concepts", tier = tier.as_str(), items = n, "Tier striped");
    }

    // 3) balancing
    let mut shortfalls = Vec::new();
    for level in 1..=policy.level_count {
        let deficit = band.min.saturating_sub(buckets.count(level));
        if deficit == 0 {
            continue;
        }
        let mut candidates: Vec<usize> = (0..items.len())
            .filter(|&i| !buckets.contains(level, i))
            .filter(|&i| buckets.placements[i] == 0 || !is_spiral[i])
            .filter(|&i| {
                buckets.placements[i] == 0
                    || policy.balance_across_tiers
                    || policy.tier_covers(items[i].difficulty, level)
            })
            .collect();
        candidates.sort_by_key(|&i| {
            let placed = buckets.placements[i];
            (placed > 0, !policy.tier_covers(items[i].difficulty, level), placed, i)
        });
        for &i in candidates.iter().take(deficit) {
            buckets.place(level, i);
        }
        let count = buckets.count(level);
        if count < band.min {
            let missing = band.min - count;
            warn!(target: "concepts", level, count, missing, "Level below band minimum; pool exhausted");
            shortfalls.push(LevelShortfall { level, count, missing });
        }
    }

    // 4) exhaustive coverage
    let late_covered_items = cover_remaining(&mut buckets, policy);
    if late_covered_items > 0 {
        info!(target: "concepts", late_covered_items, "Coverage sweep placed remaining items");
    }

    let overfull_levels: Vec<u32> = (1..=policy.level_count).filter(|&l| buckets.count(l) > band.max).collect();
    if !overfull_levels.is_empty() {
        warn!(target: "concepts", ?overfull_levels, max = band.max, "Levels above band maximum");
    }

    let assignment = buckets.into_assignment(items);
    info!(
        target: "concepts",
        items = items.len(),
        spilled_items,
        shortfall_levels = shortfalls.len(),
        overfull_levels = overfull_levels.len(),
        "Concept distribution complete"
    );

    Ok(Distribution {
        assignment,
        shortfalls,
        overfull_levels,
        spilled_items,
        late_covered_items,
    })
}

/// Place every item that sits in no level, round-robin from level 1, preferring
/// levels under the band maximum. Returns how many items were placed.
fn cover_remaining(buckets: &mut Buckets, policy: &DistributionPolicy) -> usize {
    let uncovered: Vec<usize> = (0..buckets.placements.len()).filter(|&i| buckets.placements[i] == 0).collect();
    for (k, &item) in uncovered.iter().enumerate() {
        let round_robin = (k as u32 % policy.level_count) + 1;
        let level = (0..policy.level_count)
            .map(|step| (round_robin - 1 + step) % policy.level_count + 1)
            .find(|&l| buckets.count(l) < policy.band.max)
            .unwrap_or(round_robin);
        buckets.place(level, item);
    }
    uncovered.len()
}

/// Stripe `chunk` over `range` in index order. Returns how many items spilled.
fn stripe(buckets: &mut Buckets, chunk: &[usize], range: LevelRange, policy: &DistributionPolicy) -> usize {
    if chunk.is_empty() {
        return 0;
    }
    let span = range.span() as usize;
    let per_level = (chunk.len() / span).max(1);
    let mut spilled = 0;
    for (i, &item) in chunk.iter().enumerate() {
        let target = range.start + (i / per_level).min(span - 1) as u32;
        let level = if buckets.count(target) < policy.band.max {
            target
        } else {
            buckets
                .find_spill(target, range, policy.band.max, policy.level_count)
                .unwrap_or(target)
        };
        if level != target {
            spilled += 1;
        }
        buckets.place(level, item);
    }
    spilled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: String, difficulty: Difficulty, importance: Importance) -> ConceptItem {
        ConceptItem::new(id, "governance", difficulty, importance)
    }

    fn pool(per_tier: [usize; 4], importance: Importance) -> Vec<ConceptItem> {
        let mut out = Vec::new();
        for (tier, n) in Difficulty::ALL.into_iter().zip(per_tier) {
            for i in 0..n {
                out.push(item(format!("{}-{i}", tier.as_str()), tier, importance));
            }
        }
        out
    }

    fn assert_full_coverage(items: &[ConceptItem], a: &LevelAssignment) {
        let covered = a.covered_ids();
        for it in items {
            assert!(covered.contains(it.id.as_str()), "{} not covered", it.id);
        }
    }

    #[test]
    fn default_policy_is_valid() {
        DistributionPolicy::default().validate().expect("default policy");
    }

    #[test]
    fn inconsistent_policy_fails_fast() {
        let mut p = DistributionPolicy::default();
        p.band = TargetBand { min: 20, max: 10 };
        assert!(matches!(distribute(&[], &p), Err(DistributeError::InvalidPolicy(_))));

        let mut p = DistributionPolicy::default();
        p.level_count = 30;
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("spiral level 33") || err.to_string().contains("range"));

        let mut p = DistributionPolicy::default();
        p.tiers.intermediate[0].share = 0.5;
        assert!(p.validate().is_err());

        let mut p = DistributionPolicy::default();
        p.spiral.expert = vec![23, 23, 33];
        assert!(p.validate().is_err());
    }

    #[test]
    fn empty_pool_gives_empty_levels() {
        let d = distribute(&[], &DistributionPolicy::default()).expect("empty is fine");
        assert_eq!(d.assignment.level_count(), 40);
        assert!(d.assignment.levels.values().all(Vec::is_empty));
        assert!(d.shortfalls.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let items = vec![
            item("c1".into(), Difficulty::Beginner, Importance::Low),
            item("c1".into(), Difficulty::Expert, Importance::Low),
        ];
        assert_eq!(
            distribute(&items, &DistributionPolicy::default()).unwrap_err(),
            DistributeError::DuplicateItemId("c1".into())
        );
    }

    #[test]
    fn small_mixed_pool_matches_tier_ranges() {
        let items = pool([10, 15, 10, 5], Importance::Medium);
        let d = distribute(&items, &DistributionPolicy::default()).expect("distribute");
        let a = &d.assignment;

        assert_full_coverage(&items, a);
        assert_eq!(d.late_covered_items, 0);
        for it in &items {
            let levels = a.levels_of(&it.id);
            assert!(!levels.is_empty());
            match it.difficulty {
                Difficulty::Beginner => assert!(levels.iter().all(|l| (1..=10).contains(l)), "{}: {levels:?}", it.id),
                Difficulty::Advanced => assert!(levels.iter().all(|l| (21..=35).contains(l)), "{}: {levels:?}", it.id),
                Difficulty::Expert => assert!(levels.iter().all(|l| (31..=40).contains(l)), "{}: {levels:?}", it.id),
                Difficulty::Intermediate => assert!(levels.iter().all(|l| (1..=30).contains(l))),
            }
        }
        // Only the five expert cards can serve levels 36..=40.
        let short: Vec<u32> = d.shortfalls.iter().map(|s| s.level).collect();
        assert_eq!(short, vec![36, 37, 38, 39, 40]);
        assert!(d.shortfalls.iter().all(|s| s.count == 5 && s.missing == 5));
    }

    #[test]
    fn even_pool_mostly_within_band() {
        let items = pool([100, 100, 100, 100], Importance::Medium);
        let policy = DistributionPolicy::default();
        let d = distribute(&items, &policy).expect("distribute");
        let in_band = (1..=40).filter(|&l| policy.band.contains(d.assignment.count(l))).count();
        assert!(in_band >= 36, "only {in_band} of 40 levels within band");
        assert_full_coverage(&items, &d.assignment);
        assert!(d.overfull_levels.is_empty());
    }

    #[test]
    fn high_importance_items_recur() {
        let mut items = pool([40, 60, 40, 20], Importance::Medium);
        for (i, it) in items.iter_mut().enumerate() {
            if i % 5 == 0 {
                it.importance = Importance::High;
            }
        }
        let d = distribute(&items, &DistributionPolicy::default()).expect("distribute");
        for it in items.iter().filter(|i| i.importance == Importance::High) {
            let levels = d.assignment.levels_of(&it.id);
            assert!(levels.len() >= 3, "{} only at {levels:?}", it.id);
        }
        assert_full_coverage(&items, &d.assignment);
    }

    #[test]
    fn crowded_spiral_levels_keep_minimum_recurrence() {
        // 60 high-importance beginners all target levels 3/8/13/18.
        let items = pool([60, 0, 0, 0], Importance::High);
        let d = distribute(&items, &DistributionPolicy::default()).expect("distribute");
        for it in &items {
            let levels = d.assignment.levels_of(&it.id);
            assert!(levels.len() >= 3);
            assert!(levels.iter().all(|l| [3, 8, 13, 18].contains(l)));
        }
        // The first 18 fill every spiral level; later ones skip the full level 3.
        assert_eq!(d.assignment.levels_of("beginner-0"), vec![3, 8, 13, 18]);
        assert_eq!(d.assignment.levels_of("beginner-59"), vec![8, 13, 18]);
    }

    #[test]
    fn overloaded_tier_spills_into_neighbours() {
        let items = pool([400, 0, 0, 0], Importance::Low);
        let policy = DistributionPolicy::default();
        let d = distribute(&items, &policy).expect("distribute");
        assert!(d.spilled_items > 0);
        assert_full_coverage(&items, &d.assignment);
        // 22 full levels hold them, starting at the beginner range
        assert!(d.overfull_levels.is_empty());
        assert_eq!(d.assignment.count(1), 18);
        assert!(d.assignment.count(11) > 0);
    }

    #[test]
    fn full_pool_overflows_rather_than_dropping_items() {
        let mut policy = DistributionPolicy::default();
        policy.level_count = 2;
        policy.band = TargetBand { min: 1, max: 2 };
        policy.spiral = TierTable { beginner: vec![1], intermediate: vec![1], advanced: vec![2], expert: vec![2] };
        let whole = vec![TierSlice { share: 1.0, range: LevelRange::new(1, 2) }];
        policy.tiers = TierTable {
            beginner: whole.clone(),
            intermediate: whole.clone(),
            advanced: whole.clone(),
            expert: whole,
        };
        let items = pool([3, 3, 0, 0], Importance::Low);
        let d = distribute(&items, &policy).expect("distribute");
        assert_full_coverage(&items, &d.assignment);
        assert_eq!(d.assignment.count(1), 2);
        assert_eq!(d.overfull_levels, vec![2]);
    }

    #[test]
    fn coverage_sweep_round_robins_with_room() {
        let mut policy = DistributionPolicy::default();
        policy.level_count = 3;
        policy.band = TargetBand { min: 0, max: 2 };
        let mut buckets = Buckets::new(3, 7);
        buckets.place(1, 0);
        buckets.place(1, 1);

        assert_eq!(cover_remaining(&mut buckets, &policy), 5);
        assert!(buckets.placements.iter().all(|&p| p == 1));
        // level 1 was full, so the first sweep item moved on to level 2
        assert_eq!(buckets.members[0], vec![0, 1]);
        assert_eq!(buckets.members[2], vec![4, 5]);
        // nothing has room for the last one: it goes to its round-robin level anyway
        assert_eq!(buckets.members[1], vec![2, 3, 6]);
        assert!(buckets.contains(2, 6));
    }

    #[test]
    fn assignment_helpers() {
        let mut a = LevelAssignment::empty(3);
        a.levels.get_mut(&2).expect("level 2").push("c9".into());
        a.levels.get_mut(&3).expect("level 3").push("c9".into());
        assert_eq!(a.levels_of("c9"), vec![2, 3]);
        assert_eq!(a.count(2), 1);
        assert_eq!(a.items_at(1), Some(&[][..]));
        assert_eq!(a.items_at(9), None);
        assert!(a.covered_ids().contains("c9"));
    }

    #[test]
    fn policy_reads_from_toml() {
        let p: DistributionPolicy = toml::from_str(
            r#"
            level_count = 20
            [band]
            min = 4
            max = 8
            [spiral]
            beginner = [2, 5, 8]
            intermediate = [2, 5, 8]
            advanced = [8, 11, 14]
            expert = [14, 17, 20]
            [tiers]
            beginner = [{ share = 1.0, range = [1, 5] }]
            intermediate = [{ share = 0.5, range = [1, 10] }, { share = 0.5, range = [6, 15] }]
            advanced = [{ share = 1.0, range = [11, 17] }]
            expert = [{ share = 1.0, range = [16, 20] }]
            "#,
        )
        .expect("toml policy");
        p.validate().expect("valid");
        assert_eq!(p.tiers.intermediate[1].range, LevelRange::new(6, 15));
        assert_eq!(p.min_spiral_occurrences, 3);
    }
}
