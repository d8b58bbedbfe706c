//! Ordering and numbering of sections by their hierarchical references.
//!
//! Authors write references as free text (`Forms - Buttons`), manual numbers
//! (`2.1`) or a mix of both. Resolution sorts the whole collection by those
//! references, honouring per-section weights, then walks the sorted list once
//! to give every text reference a numeric one (`1.2`) derived from its
//! position in the tree.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::StyleguideError;
use crate::models::Section;

/// Lower-case a reference and use `.` as its only delimiter.
pub fn normalize_reference(reference: &str) -> String {
    reference.to_lowercase().replace(" - ", ".")
}

fn chunks_of(reference: &str) -> Vec<String> {
    normalize_reference(reference)
        .split('.')
        .map(str::to_string)
        .collect()
}

/// Weight declared by each section for its own normalized reference.
///
/// Ancestors get no implicit entry: a lookup for a prefix nobody declared
/// yields 0.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WeightMap(HashMap<String, i32>);

impl WeightMap {
    pub fn build(sections: &[Section]) -> Self {
        Self(
            sections
                .iter()
                .map(|s| (normalize_reference(&s.reference), s.weight))
                .collect(),
        )
    }

    pub fn get(&self, normalized: &str) -> i32 {
        self.0.get(normalized).copied().unwrap_or(0)
    }

    /// Weight of the reference formed by `chunks[..=depth]`.
    fn at_depth(&self, chunks: &[String], depth: usize) -> i32 {
        self.get(&chunks[..=depth].join("."))
    }
}

/// Compare two references chunk by chunk.
///
/// At the first differing chunk the lower weight wins, then numeric chunks
/// compare by value and everything else as lower-cased text. A reference that
/// is a prefix of the other sorts first.
pub fn compare_references(a: &str, b: &str, weights: &WeightMap) -> Ordering {
    compare_chunks(&chunks_of(a), &chunks_of(b), weights)
}

fn compare_chunks(a: &[String], b: &[String], weights: &WeightMap) -> Ordering {
    for depth in 0..a.len().max(b.len()) {
        let (Some(x), Some(y)) = (a.get(depth), b.get(depth)) else {
            return a.len().cmp(&b.len());
        };
        if x == y {
            continue;
        }

        let weight_order = weights
            .at_depth(a, depth)
            .cmp(&weights.at_depth(b, depth));
        if weight_order != Ordering::Equal {
            return weight_order;
        }
        return compare_chunk(x, y);
    }
    Ordering::Equal
}

fn is_numeric(chunk: &str) -> bool {
    !chunk.is_empty() && chunk.bytes().all(|b| b.is_ascii_digit())
}

/// Order two differing chunks. Numbers sort before text so that mixed
/// siblings still form a total order.
fn compare_chunk(x: &str, y: &str) -> Ordering {
    match (is_numeric(x), is_numeric(y)) {
        (true, true) => compare_numeric(x, y).then_with(|| x.cmp(y)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => x.cmp(y),
    }
}

/// Compare digit strings by value without overflowing on long inputs.
fn compare_numeric(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Stable sort of `sections` into display order.
pub fn sort_sections(sections: Vec<Section>) -> Vec<Section> {
    let weights = WeightMap::build(&sections);
    let mut keyed: Vec<(Vec<String>, Section)> = sections
        .into_iter()
        .map(|section| (chunks_of(&section.reference), section))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_chunks(a, b, &weights));
    keyed.into_iter().map(|(_, section)| section).collect()
}

/// Running state of the numbering pass.
#[derive(Debug, Default)]
struct AutoIncrement {
    /// Counter per depth of the previous section's reference
    path: Vec<u32>,
    previous: Vec<String>,
    previous_header: String,
    /// Final reference -> header of the section holding it
    assigned: HashMap<String, String>,
}

impl AutoIncrement {
    /// Number `section` from its position after the previous one.
    fn advance(&mut self, mut section: Section) -> Result<Section, StyleguideError> {
        let chunks = chunks_of(&section.reference);

        let increment_index = chunks
            .iter()
            .zip(&self.previous)
            .take_while(|(current, previous)| current == previous)
            .count();

        // Nothing left below the shared prefix: the same chain twice
        if increment_index >= chunks.len() {
            return Err(self.collision(&section, &section.reference));
        }

        if increment_index < self.path.len() {
            self.path[increment_index] += 1;
            self.path.truncate(increment_index + 1);
        } else {
            self.path.push(1);
        }
        self.path.resize(chunks.len(), 1);

        if !section.has_numeric_reference() {
            let numeric = self
                .path
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(".");
            let original = std::mem::replace(&mut section.reference, numeric);
            section.string_reference = Some(original);
        }

        if let Some(holder) = self.assigned.get(&section.reference) {
            return Err(StyleguideError::ReferenceCollision {
                previous: holder.clone(),
                current: section.header.clone(),
                reference: section
                    .string_reference
                    .clone()
                    .unwrap_or_else(|| section.reference.clone()),
            });
        }
        self.assigned
            .insert(section.reference.clone(), section.header.clone());

        self.previous = chunks;
        self.previous_header = section.header.clone();
        Ok(section)
    }

    fn collision(&self, current: &Section, reference: &str) -> StyleguideError {
        StyleguideError::ReferenceCollision {
            previous: self.previous_header.clone(),
            current: current.header.clone(),
            reference: reference.to_string(),
        }
    }
}

/// Assign numeric references to an already sorted collection.
pub fn assign_references(sorted: Vec<Section>) -> Result<Vec<Section>, StyleguideError> {
    let capacity = sorted.len();
    sorted
        .into_iter()
        .try_fold(
            (AutoIncrement::default(), Vec::with_capacity(capacity)),
            |(mut state, mut resolved), section| -> Result<_, StyleguideError> {
                resolved.push(state.advance(section)?);
                Ok((state, resolved))
            },
        )
        .map(|(_, resolved)| resolved)
}

/// Sort and number `sections`, leaving the caller's collection untouched.
pub fn resolve(sections: &[Section]) -> Result<Vec<Section>, StyleguideError> {
    resolve_owned(sections.to_vec())
}

/// Sort and number `sections`.
pub fn resolve_owned(sections: Vec<Section>) -> Result<Vec<Section>, StyleguideError> {
    assign_references(sort_sections(sections))
}
