//! Ordering rules for the stops of an estimate.
//!
//! Every operation leaves sequences dense (`1..N`) and derives the role of each
//! stop from its position: the first stop is the origin, the last one the
//! destination, everything in between a plain stop. Routes with fewer than two
//! stops keep whatever role they already had.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::domain::stop::{Stop, StopChange, StopKind};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("stop {0} does not belong to this estimate")]
    UnknownStop(i32),
    #[error("new order must list every stop of the estimate exactly once")]
    IncompleteOrder,
}

/// Role of the stop at zero-based `position` in a route of `len` stops.
pub fn role_for(position: usize, len: usize) -> Option<StopKind> {
    if len < 2 {
        return None;
    }
    Some(if position == 0 {
        StopKind::Origin
    } else if position + 1 == len {
        StopKind::Destination
    } else {
        StopKind::Stop
    })
}

/// Sort by the current sequence and rewrite it as `1..N` with derived roles.
pub fn resequence(stops: &mut [Stop]) {
    stops.sort_by_key(|stop| (stop.sequence, stop.id));
    renumber(stops);
}

fn renumber(stops: &mut [Stop]) {
    let len = stops.len();
    for (position, stop) in stops.iter_mut().enumerate() {
        stop.sequence = position as i32 + 1;
        if let Some(kind) = role_for(position, len) {
            stop.kind = kind;
        }
    }
}

/// Put the stops in the order given by `stop_ids`, which must be a permutation
/// of the ids currently on the estimate.
pub fn reorder(stops: &mut [Stop], stop_ids: &[i32]) -> Result<(), SequenceError> {
    let known: HashSet<i32> = stops.iter().map(|stop| stop.id).collect();
    if let Some(unknown) = stop_ids.iter().find(|id| !known.contains(id)) {
        return Err(SequenceError::UnknownStop(*unknown));
    }

    let positions: HashMap<i32, usize> = stop_ids
        .iter()
        .enumerate()
        .map(|(position, id)| (*id, position))
        .collect();
    if positions.len() != stop_ids.len() || positions.len() != stops.len() {
        return Err(SequenceError::IncompleteOrder);
    }

    stops.sort_by_key(|stop| positions.get(&stop.id).copied().unwrap_or(usize::MAX));
    renumber(stops);
    Ok(())
}

/// Insert `stop` just before the current destination, or first when the route
/// has no destination yet. Returns the index of the inserted stop.
pub fn insert(stops: &mut Vec<Stop>, mut stop: Stop) -> usize {
    resequence(stops);
    let at = stops
        .iter()
        .filter(|existing| existing.kind == StopKind::Destination)
        .map(|existing| existing.sequence)
        .max()
        .unwrap_or(1);

    for existing in stops.iter_mut() {
        if existing.sequence >= at {
            existing.sequence += 1;
        }
    }
    stop.sequence = at;
    stop.kind = StopKind::Stop;
    stops.push(stop);
    resequence(stops);

    // Sequences were dense before the shift, so the new stop keeps `at`.
    at as usize - 1
}

/// Remove a stop and close the gap it leaves.
pub fn remove(stops: &mut Vec<Stop>, stop_id: i32) -> Result<Stop, SequenceError> {
    let position = stops
        .iter()
        .position(|stop| stop.id == stop_id)
        .ok_or(SequenceError::UnknownStop(stop_id))?;
    let removed = stops.remove(position);
    resequence(stops);
    Ok(removed)
}

/// Apply a structural change to the stops of `estimate_id`.
///
/// Added stops carry id `0` until they are stored.
pub fn apply_change(
    stops: &mut Vec<Stop>,
    estimate_id: i32,
    change: &StopChange,
) -> Result<(), SequenceError> {
    match change {
        StopChange::Add(new_stop) => {
            insert(stops, Stop::pending(estimate_id, new_stop));
        }
        StopChange::Update { stop_id, updates } => {
            let stop = stops
                .iter_mut()
                .find(|stop| stop.id == *stop_id)
                .ok_or(SequenceError::UnknownStop(*stop_id))?;
            updates.apply_to(stop);
        }
        StopChange::Delete { stop_id } => {
            remove(stops, *stop_id)?;
        }
        StopChange::Reorder { stop_ids } => reorder(stops, stop_ids)?,
    }
    Ok(())
}
