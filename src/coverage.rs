//! Coverage report over a level assignment: what is placed, where, and how often.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::distribute::{LevelAssignment, TargetBand};
use crate::domain::ConceptItem;

#[derive(Clone, Debug, Serialize)]
pub struct CoverageReport {
  pub total_items: usize,
  pub assigned_items: usize,
  pub unassigned_items: Vec<String>,
  pub coverage_percentage: f64,
  /// domain -> number of placements (duplicates counted)
  pub domain_distribution: BTreeMap<String, usize>,
  pub level_distribution: BTreeMap<u32, usize>,
  /// item id -> levels, for items placed in more than one level
  pub spiral_learning: BTreeMap<String, Vec<u32>>,
  pub levels_in_band: usize,
}

/// Ids in the assignment that are not in `items` are ignored for domain counts
/// but still show up in the level distribution.
pub fn coverage_report(items: &[ConceptItem], assignment: &LevelAssignment, band: TargetBand) -> CoverageReport {
  let domain_of: HashMap<&str, &str> = items.iter().map(|i| (i.id.as_str(), i.domain.as_str())).collect();

  let mut item_levels: HashMap<&str, Vec<u32>> = HashMap::new();
  let mut domain_distribution = BTreeMap::new();
  let mut level_distribution = BTreeMap::new();
  for (&level, ids) in &assignment.levels {
    level_distribution.insert(level, ids.len());
    for id in ids {
      item_levels.entry(id.as_str()).or_default().push(level);
      if let Some(domain) = domain_of.get(id.as_str()) {
        *domain_distribution.entry(domain.to_string()).or_insert(0) += 1;
      }
    }
  }

  let unassigned_items: Vec<String> = items
    .iter()
    .filter(|i| !item_levels.contains_key(i.id.as_str()))
    .map(|i| i.id.clone())
    .collect();
  let assigned_items = items.len() - unassigned_items.len();
  let coverage_percentage = if items.is_empty() {
    100.0
  } else {
    assigned_items as f64 * 100.0 / items.len() as f64
  };

  let spiral_learning = item_levels
    .into_iter()
    .filter(|(_, levels)| levels.len() > 1)
    .map(|(id, levels)| (id.to_string(), levels))
    .collect();

  let levels_in_band = level_distribution.values().filter(|&&c| band.contains(c)).count();

  CoverageReport {
    total_items: items.len(),
    assigned_items,
    unassigned_items,
    coverage_percentage,
    domain_distribution,
    level_distribution,
    spiral_learning,
    levels_in_band,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, Importance};

  #[test]
  fn reports_gaps_domains_and_spirals() {
    let items = vec![
      ConceptItem::new("c1", "risk", Difficulty::Beginner, Importance::High),
      ConceptItem::new("c2", "risk", Difficulty::Beginner, Importance::Low),
      ConceptItem::new("c3", "law", Difficulty::Expert, Importance::Low),
      ConceptItem::new("c4", "law", Difficulty::Expert, Importance::Low),
    ];
    let mut a = LevelAssignment::empty(3);
    a.levels.insert(1, vec!["c1".into(), "c2".into()]);
    a.levels.insert(2, vec!["c1".into(), "c3".into()]);

    let r = coverage_report(&items, &a, TargetBand { min: 2, max: 5 });
    assert_eq!(r.total_items, 4);
    assert_eq!(r.assigned_items, 3);
    assert_eq!(r.unassigned_items, vec!["c4".to_string()]);
    assert!((r.coverage_percentage - 75.0).abs() < 1e-9);
    assert_eq!(r.domain_distribution["risk"], 3);
    assert_eq!(r.domain_distribution["law"], 1);
    assert_eq!(r.level_distribution[&3], 0);
    assert_eq!(r.spiral_learning.len(), 1);
    assert_eq!(r.spiral_learning["c1"], vec![1, 2]);
    assert_eq!(r.levels_in_band, 2);
  }

  #[test]
  fn empty_pool_is_fully_covered() {
    let r = coverage_report(&[], &LevelAssignment::empty(40), TargetBand { min: 10, max: 18 });
    assert_eq!(r.coverage_percentage, 100.0);
    assert_eq!(r.levels_in_band, 0);
    assert_eq!(r.level_distribution.len(), 40);
  }
}
