//! services/distribution_service.rs
//! Reparto greedy de compañías entre webhooks: cada webhook, en orden,
//! toma un tramo contiguo de hasta `capacity` compañías.

#[derive(Debug)]
pub struct Assignment<'a, W, C> {
    pub webhook: &'a W,
    pub companies: &'a [C],
}

#[derive(Debug)]
pub struct Distribution<'a, W, C> {
    pub assignments: Vec<Assignment<'a, W, C>>,
    /// Compañías que no cupieron en ningún webhook.
    pub unassigned: usize,
}

impl<W, C> Distribution<'_, W, C> {
    pub fn assigned(&self) -> usize {
        self.assignments.iter().map(|a| a.companies.len()).sum()
    }
}

pub fn distribute<'a, W, C>(
    companies: &'a [C],
    webhooks: &'a [W],
    capacity: usize,
) -> Distribution<'a, W, C> {
    let mut assignments = Vec::new();
    let mut remaining = companies;

    for webhook in webhooks {
        if remaining.is_empty() {
            break;
        }
        let take = capacity.min(remaining.len());
        if take == 0 {
            continue;
        }
        let (slice, rest) = remaining.split_at(take);
        assignments.push(Assignment {
            webhook,
            companies: slice,
        });
        remaining = rest;
    }

    Distribution {
        assignments,
        unassigned: remaining.len(),
    }
}
