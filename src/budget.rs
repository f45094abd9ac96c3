//! Streaming YAML budget checker.
//!
//! This inspects the event stream before nodes are built and enforces simple
//! budgets to avoid pathological inputs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::event::Event;
use crate::live_events::LiveEvents;

/// Budgets for a streaming YAML scan.
///
/// The defaults are intentionally permissive for typical configuration files
/// while stopping obvious resource-amplifying inputs.
///
/// ```rust
/// use saphyr_repr::{from_str_with_options, Budget, CoreSchema, Options};
///
/// let mut options = Options::default();
/// options.budget = Some(Budget {
///     max_depth: 8,
///     ..Budget::default()
/// });
///
/// let doc = from_str_with_options("a: [1, 2, 3]\n", CoreSchema::instance(), options).unwrap();
/// assert!(doc.root().as_mapping().is_some());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum total events (counting every event).
    ///
    /// Default: 1,000,000
    pub max_events: usize,
    /// Maximum number of alias (`*ref`) events allowed.
    ///
    /// Default: 50,000
    pub max_aliases: usize,
    /// Maximal total number of anchors (distinct `&anchor` definitions).
    ///
    /// Default: 50,000
    pub max_anchors: usize,
    /// Maximum structural nesting depth (sequences + mappings).
    ///
    /// Default: 2,000
    pub max_depth: usize,
    /// Maximum number of YAML documents in the stream.
    ///
    /// Default: 1,024
    pub max_documents: usize,
    /// Maximum number of *nodes* (sequence starts, mapping starts, scalars).
    ///
    /// Default: 250,000
    pub max_nodes: usize,
    /// Maximum total bytes of scalar contents.
    ///
    /// Default: 67,108,864 (64 MiB)
    pub max_total_scalar_bytes: usize,
    /// If `true`, flag inputs that use an excessive number of aliases relative
    /// to the number of defined anchors.
    ///
    /// Default: true
    pub enforce_alias_anchor_ratio: bool,
    /// Minimum number of aliases before the alias/anchor ratio is evaluated.
    ///
    /// Default: 100
    pub alias_anchor_min_aliases: usize,
    /// A breach occurs when `aliases > alias_anchor_ratio_multiplier * anchors`.
    ///
    /// Default: 10
    pub alias_anchor_ratio_multiplier: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_events: 1_000_000, // plenty for normal configs
            max_aliases: 50_000,   // liberal absolute cap
            max_anchors: 50_000,
            max_depth: 2_000,                         // protects stack/CPU
            max_documents: 1_024,                     // doc separator storms
            max_nodes: 250_000,                       // sequences + maps + scalars
            max_total_scalar_bytes: 64 * 1024 * 1024, // 64 MiB of scalar text
            enforce_alias_anchor_ratio: true,
            alias_anchor_min_aliases: 100,
            alias_anchor_ratio_multiplier: 10,
        }
    }
}

/// What tripped the budget (if anything).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetBreach {
    /// The total number of events exceeded [`Budget::max_events`].
    Events { events: usize },
    /// The number of alias events exceeded [`Budget::max_aliases`].
    Aliases { aliases: usize },
    /// The number of distinct anchors exceeded [`Budget::max_anchors`].
    Anchors { anchors: usize },
    /// The structural nesting depth exceeded [`Budget::max_depth`].
    Depth { depth: usize },
    /// The number of documents exceeded [`Budget::max_documents`].
    Documents { documents: usize },
    /// The number of nodes exceeded [`Budget::max_nodes`].
    Nodes { nodes: usize },
    /// The cumulative size of scalar contents exceeded [`Budget::max_total_scalar_bytes`].
    ScalarBytes { total_scalar_bytes: usize },
    /// Aliases outnumber anchors by more than [`Budget::alias_anchor_ratio_multiplier`].
    AliasAnchorRatio { aliases: usize, anchors: usize },
    /// A closing event was encountered without a matching opening event.
    Unbalanced,
}

/// Summary of the scan (even if no breach).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BudgetReport {
    /// `Some(..)` if a limit was exceeded; `None` if all budgets were respected.
    pub breached: Option<BudgetBreach>,
    pub events: usize,
    pub aliases: usize,
    pub anchors: usize,
    pub documents: usize,
    pub nodes: usize,
    /// Maximum structural nesting depth reached at any point in the stream.
    pub max_depth: usize,
    pub total_scalar_bytes: usize,
}

/// Stateful helper that enforces a [`Budget`] while consuming a stream of [`Event`]s.
#[derive(Debug)]
pub struct BudgetEnforcer {
    budget: Budget,
    report: BudgetReport,
    depth: usize,
    defined_anchors: HashSet<usize>,
}

impl BudgetEnforcer {
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            report: BudgetReport::default(),
            depth: 0,
            defined_anchors: HashSet::with_capacity(256),
        }
    }

    /// Observe an [`Event`], updating the internal counters.
    ///
    /// Returns `Err(BudgetBreach)` as soon as a limit is exceeded.
    pub fn observe(&mut self, ev: &Event) -> Result<(), BudgetBreach> {
        self.report.events += 1;
        if self.report.events > self.budget.max_events {
            return Err(BudgetBreach::Events {
                events: self.report.events,
            });
        }

        match ev {
            Event::StreamStart | Event::StreamEnd | Event::DocumentEnd { .. } => {}
            Event::DocumentStart { .. } => {
                self.report.documents += 1;
                if self.report.documents > self.budget.max_documents {
                    return Err(BudgetBreach::Documents {
                        documents: self.report.documents,
                    });
                }
            }
            Event::Alias { .. } => {
                self.report.aliases += 1;
                if self.report.aliases > self.budget.max_aliases {
                    return Err(BudgetBreach::Aliases {
                        aliases: self.report.aliases,
                    });
                }
            }
            Event::Scalar(scalar) => {
                self.bump_nodes()?;
                self.report.total_scalar_bytes = self
                    .report
                    .total_scalar_bytes
                    .saturating_add(scalar.value.len());
                if self.report.total_scalar_bytes > self.budget.max_total_scalar_bytes {
                    return Err(BudgetBreach::ScalarBytes {
                        total_scalar_bytes: self.report.total_scalar_bytes,
                    });
                }
                self.record_anchor(scalar.anchor.map(|a| a.0))?;
            }
            Event::SequenceStart(start) | Event::MappingStart(start) => {
                self.bump_nodes()?;
                self.depth = self.depth.saturating_add(1);
                if self.depth > self.report.max_depth {
                    self.report.max_depth = self.depth;
                }
                if self.report.max_depth > self.budget.max_depth {
                    return Err(BudgetBreach::Depth {
                        depth: self.report.max_depth,
                    });
                }
                self.record_anchor(start.anchor.map(|a| a.0))?;
            }
            Event::SequenceEnd { .. } | Event::MappingEnd { .. } => {
                match self.depth.checked_sub(1) {
                    Some(new_depth) => self.depth = new_depth,
                    None => return Err(BudgetBreach::Unbalanced),
                }
            }
        }

        Ok(())
    }

    fn bump_nodes(&mut self) -> Result<(), BudgetBreach> {
        self.report.nodes += 1;
        if self.report.nodes > self.budget.max_nodes {
            return Err(BudgetBreach::Nodes {
                nodes: self.report.nodes,
            });
        }
        Ok(())
    }

    fn record_anchor(&mut self, anchor_id: Option<usize>) -> Result<(), BudgetBreach> {
        if let Some(id) = anchor_id {
            if self.defined_anchors.insert(id) {
                let count = self.defined_anchors.len();
                if count > self.budget.max_anchors {
                    self.report.anchors = count;
                    return Err(BudgetBreach::Anchors { anchors: count });
                }
            }
        }
        self.report.anchors = self.defined_anchors.len();
        Ok(())
    }

    /// Consume the enforcer and return the accumulated [`BudgetReport`].
    ///
    /// This should be used after a breach has already been detected.
    pub fn into_report(mut self) -> BudgetReport {
        self.report.anchors = self.defined_anchors.len();
        self.report
    }

    /// Finalize the enforcement, performing post-scan heuristics (alias/anchor ratio).
    pub fn finalize(mut self) -> BudgetReport {
        self.report.anchors = self.defined_anchors.len();

        if self.budget.enforce_alias_anchor_ratio
            && self.report.aliases >= self.budget.alias_anchor_min_aliases
            && (self.report.anchors == 0
                || self.report.aliases
                    > self.budget.alias_anchor_ratio_multiplier * self.report.anchors)
        {
            self.report.breached = Some(BudgetBreach::AliasAnchorRatio {
                aliases: self.report.aliases,
                anchors: self.report.anchors,
            });
        }

        self.report
    }
}

/// Check YAML text against the given `Budget` without building any nodes.
///
/// Returns:
/// - `Ok(report)`: `report.breached.is_none()` means **within budget**.
/// - `Err(Error)`: scanning (lexing/parsing) failed.
pub fn check_budget(input: &str, budget: &Budget) -> Result<BudgetReport, Error> {
    let mut enforcer = BudgetEnforcer::new(budget.clone());

    for item in LiveEvents::new(input) {
        let ev = item?;
        if let Err(breach) = enforcer.observe(&ev) {
            let mut report = enforcer.into_report();
            report.breached = Some(breach);
            return Ok(report);
        }
    }

    Ok(enforcer.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_yaml_ok() {
        let b = Budget::default();
        let y = "a: [1, 2, 3]\n";
        let r = check_budget(y, &b).unwrap();
        assert!(r.breached.is_none());
        assert_eq!(r.documents, 1);
        assert_eq!(r.nodes, 6);
        assert_eq!(r.max_depth, 2);
    }

    #[test]
    fn alias_bomb_trips_alias_limit() {
        let y = r#"root: &A [1, 2]
a: *A
b: *A
c: *A
d: *A
e: *A
"#;

        let mut b = Budget::default();
        b.max_aliases = 3;

        let rep = check_budget(y, &b).unwrap();
        assert!(matches!(rep.breached, Some(BudgetBreach::Aliases { .. })));
    }

    #[test]
    fn deep_nesting_trips_depth() {
        let mut y = String::new();
        for _ in 0..200 {
            y.push('[');
        }
        for _ in 0..200 {
            y.push(']');
        }

        let mut b = Budget::default();
        b.max_depth = 150;

        let rep = check_budget(&y, &b).unwrap();
        assert!(matches!(rep.breached, Some(BudgetBreach::Depth { .. })));
    }

    #[test]
    fn anchors_limit_trips() {
        let y = "a: &A 1\nb: &B 2\nc: &C 3\n";
        let mut b = Budget::default();
        b.max_anchors = 2;
        let rep = check_budget(y, &b).unwrap();
        assert_eq!(rep.breached, Some(BudgetBreach::Anchors { anchors: 3 }));
    }

    #[test]
    fn alias_anchor_ratio_trips_when_excessive() {
        let yaml = "root: &A [1]\na: *A\nb: *A\nc: *A\n";

        let mut budget = Budget::default();
        budget.alias_anchor_min_aliases = 1;
        budget.alias_anchor_ratio_multiplier = 2;

        let report = check_budget(yaml, &budget).unwrap();
        assert_eq!(
            report.breached,
            Some(BudgetBreach::AliasAnchorRatio {
                aliases: 3,
                anchors: 1
            })
        );
    }

    #[test]
    fn unbalanced_end_is_reported() {
        let mut enforcer = BudgetEnforcer::new(Budget::default());
        let end = Event::SequenceEnd {
            location: crate::Location::UNKNOWN,
        };
        assert_eq!(enforcer.observe(&end), Err(BudgetBreach::Unbalanced));
    }
}
