//! Scores used to pick children: [UCT] while searching and the raw win rate
//! when committing to a move.
//!
//! [UCT]: https://www.chessprogramming.org/UCT

/// Stands in for a zero visit count so that neither the division nor the
/// logarithm degenerates.
pub const EPSILON: f64 = 0.001;

fn guarded(visits: u32) -> f64 {
    if visits == 0 {
        EPSILON
    } else {
        f64::from(visits)
    }
}

/// Fraction of the playouts through a node that were won by the player who
/// moved into it.
#[must_use]
pub fn win_rate(wins: u32, visits: u32) -> f64 {
    f64::from(wins) / guarded(visits)
}

/// `win_rate + exploration * sqrt(ln(parent_visits) / visits)`.
///
/// Zero visit counts are replaced with [`EPSILON`]. The logarithm of a
/// substituted parent count is negative, so the exploration term is clamped at
/// zero to keep the result finite.
#[must_use]
pub fn uct(wins: u32, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
    let visits_f = guarded(visits);
    let log_parent = guarded(parent_visits).ln().max(0.0);
    exploration.mul_add((log_parent / visits_f).sqrt(), f64::from(wins) / visits_f)
}

/// Returns the first item with the highest score. Unlike
/// [`Iterator::max_by`], which keeps the last of equal elements, ties go to
/// the earliest item so that selection is stable in child order.
pub fn first_max_by<T, I, F>(items: I, mut score: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> f64,
{
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let value = score(&item);
        match &best {
            Some((_, best_value)) if value <= *best_value => {},
            _ => best = Some((item, value)),
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn win_rates() {
        assert!(close(win_rate(3, 4), 0.75));
        assert!(close(win_rate(0, 0), 0.0));
        assert!(win_rate(0, 0).is_finite());
    }

    #[test]
    fn uct_formula() {
        let expected = 0.8f64.mul_add((10f64.ln() / 4.0).sqrt(), 0.5);
        assert!(close(uct(2, 4, 10, 0.8), expected));
        // Without exploration UCT is just the win rate.
        assert!(close(uct(2, 4, 10, 0.0), 0.5));
    }

    #[test]
    fn uct_never_degenerates() {
        for (wins, visits, parent_visits) in [(0, 0, 0), (0, 0, 1), (0, 0, 100), (0, 1, 0), (1, 1, 1)] {
            let score = uct(wins, visits, parent_visits, 0.8);
            assert!(score.is_finite(), "{wins} {visits} {parent_visits}: {score}");
            assert!(!score.is_nan());
        }
    }

    #[test]
    fn unvisited_nodes_are_explored_first() {
        assert!(uct(0, 0, 10, 0.8) > uct(10, 10, 10, 0.8));
    }

    #[test]
    fn ties_go_to_the_first_item() {
        let scores = [0.1, 0.7, 0.3, 0.7];
        assert_eq!(first_max_by(0..scores.len(), |&i| scores[i]), Some(1));
        assert_eq!(first_max_by(std::iter::empty::<usize>(), |_| 0.0), None);
        assert_eq!(first_max_by([5], |_| f64::NAN), Some(5));
    }
}
