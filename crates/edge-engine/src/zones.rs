//! Pivot detection and the bounded supply/demand zone registry.

use std::collections::VecDeque;

use edge_core::types::{Bar, ZoneAction, ZoneEvent, ZoneKind};
use edge_indicators::RingBuffer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A live supply or demand zone. Zones never move once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: u64,
    pub kind: ZoneKind,
    pub top: f64,
    pub bottom: f64,
    /// Index of the pivot bar the zone is anchored to
    pub pivot_bar_index: u64,
    /// Index of the bar on which the pivot was confirmed
    pub created_bar_index: u64,
}

impl Zone {
    /// Check if a price lies inside the zone (edges included).
    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.bottom && price <= self.top
    }

    /// A close beyond the far edge removes the zone.
    #[inline]
    pub fn is_invalidated_by(&self, close: f64) -> bool {
        match self.kind {
            ZoneKind::Supply => close > self.top,
            ZoneKind::Demand => close < self.bottom,
        }
    }

    fn event(&self, action: ZoneAction, bar_index: u64) -> ZoneEvent {
        ZoneEvent {
            action,
            zone_id: self.id,
            kind: self.kind,
            top: self.top,
            bottom: self.bottom,
            bar_index,
        }
    }
}

/// A confirmed pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub price: f64,
    pub bar_index: u64,
}

/// Confirms pivot highs and lows `right` bars after they print.
#[derive(Debug, Clone)]
pub struct PivotDetector {
    right: usize,
    highs: RingBuffer<f64>,
    lows: RingBuffer<f64>,
}

impl PivotDetector {
    pub fn new(left: usize, right: usize) -> Self {
        let span = left + right + 1;
        Self {
            right,
            highs: RingBuffer::new(span),
            lows: RingBuffer::new(span),
        }
    }

    /// Feed a bar. Returns `(pivot_high, pivot_low)` confirmed on this bar.
    pub fn update(&mut self, bar: &Bar, bar_index: u64) -> (Option<Pivot>, Option<Pivot>) {
        self.highs.push(bar.high);
        self.lows.push(bar.low);
        if !self.highs.is_full() {
            return (None, None);
        }
        let pivot_index = bar_index.saturating_sub(self.right as u64);
        let high = strict_extreme(&self.highs, self.right, |candidate, other| candidate > other)
            .map(|price| Pivot {
                price,
                bar_index: pivot_index,
            });
        let low = strict_extreme(&self.lows, self.right, |candidate, other| candidate < other)
            .map(|price| Pivot {
                price,
                bar_index: pivot_index,
            });
        (high, low)
    }
}

/// The value `offset` bars back, if it beats every other value in the window.
fn strict_extreme(
    window: &RingBuffer<f64>,
    offset: usize,
    beats: impl Fn(f64, f64) -> bool,
) -> Option<f64> {
    let candidate = window.back(offset)?;
    let len = window.len();
    (0..len)
        .filter(|&n| n != offset)
        .filter_map(|n| window.back(n))
        .all(|other| beats(candidate, other))
        .then_some(candidate)
}

/// Holds at most `max_per_kind` live zones of each kind, oldest first.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    pivots: PivotDetector,
    height: f64,
    max_per_kind: usize,
    supply: VecDeque<Zone>,
    demand: VecDeque<Zone>,
    next_id: u64,
}

impl ZoneRegistry {
    pub fn new(pivot_left: usize, pivot_right: usize, height: f64, max_per_kind: usize) -> Self {
        Self {
            pivots: PivotDetector::new(pivot_left, pivot_right),
            height,
            max_per_kind,
            supply: VecDeque::with_capacity(max_per_kind + 1),
            demand: VecDeque::with_capacity(max_per_kind + 1),
            next_id: 0,
        }
    }

    /// Process a bar: invalidate, then create from confirmed pivots, then evict.
    pub fn update(&mut self, bar: &Bar, bar_index: u64) -> Vec<ZoneEvent> {
        let mut events = Vec::new();

        for zones in [&mut self.supply, &mut self.demand] {
            zones.retain(|zone| {
                if zone.is_invalidated_by(bar.close) {
                    debug!(
                        zone_id = zone.id,
                        kind = %zone.kind,
                        close = bar.close,
                        "zone invalidated"
                    );
                    events.push(zone.event(ZoneAction::Invalidated, bar_index));
                    false
                } else {
                    true
                }
            });
        }

        let (pivot_high, pivot_low) = self.pivots.update(bar, bar_index);
        if let Some(pivot) = pivot_high {
            let bottom = pivot.price - self.height;
            let zone = self.new_zone(ZoneKind::Supply, bottom, pivot.price, pivot, bar_index);
            self.insert(zone, bar_index, &mut events);
        }
        if let Some(pivot) = pivot_low {
            let top = pivot.price + self.height;
            let zone = self.new_zone(ZoneKind::Demand, pivot.price, top, pivot, bar_index);
            self.insert(zone, bar_index, &mut events);
        }

        events
    }

    fn new_zone(
        &mut self,
        kind: ZoneKind,
        bottom: f64,
        top: f64,
        pivot: Pivot,
        bar_index: u64,
    ) -> Zone {
        let id = self.next_id;
        self.next_id += 1;
        Zone {
            id,
            kind,
            top,
            bottom,
            pivot_bar_index: pivot.bar_index,
            created_bar_index: bar_index,
        }
    }

    fn insert(&mut self, zone: Zone, bar_index: u64, events: &mut Vec<ZoneEvent>) {
        debug!(
            zone_id = zone.id,
            kind = %zone.kind,
            top = zone.top,
            bottom = zone.bottom,
            "zone created"
        );
        events.push(zone.event(ZoneAction::Created, bar_index));

        let max = self.max_per_kind;
        let zones = self.zones_mut(zone.kind);
        zones.push_back(zone);
        while zones.len() > max {
            if let Some(oldest) = zones.pop_front() {
                debug!(zone_id = oldest.id, kind = %oldest.kind, "zone evicted");
                events.push(oldest.event(ZoneAction::Evicted, bar_index));
            }
        }
    }

    fn zones_mut(&mut self, kind: ZoneKind) -> &mut VecDeque<Zone> {
        match kind {
            ZoneKind::Supply => &mut self.supply,
            ZoneKind::Demand => &mut self.demand,
        }
    }

    /// Live zones of a kind, oldest first.
    pub fn zones(&self, kind: ZoneKind) -> impl Iterator<Item = &Zone> {
        match kind {
            ZoneKind::Supply => self.supply.iter(),
            ZoneKind::Demand => self.demand.iter(),
        }
    }

    pub fn count(&self, kind: ZoneKind) -> usize {
        match kind {
            ZoneKind::Supply => self.supply.len(),
            ZoneKind::Demand => self.demand.len(),
        }
    }

    /// Check if a price sits inside any live zone of the given kind.
    pub fn contains_price(&self, kind: ZoneKind, price: f64) -> bool {
        self.zones(kind).any(|zone| zone.contains(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(high: f64, low: f64, close: f64) -> Bar {
        Bar::new(0, close, high, low, close, 1000.0)
    }

    fn flat(price: f64) -> Bar {
        bar(price, price, price)
    }

    #[test]
    fn test_pivot_high_confirms_after_right_bars() {
        let mut pivots = PivotDetector::new(2, 2);
        let highs = [100.0, 101.0, 105.0, 102.0, 101.0];
        let mut confirmed = None;
        for (i, &h) in highs.iter().enumerate() {
            let (high, _) = pivots.update(&bar(h, h - 1.0, h), i as u64);
            if i < 4 {
                assert!(high.is_none());
            }
            confirmed = high;
        }
        assert_eq!(
            confirmed,
            Some(Pivot {
                price: 105.0,
                bar_index: 2
            })
        );
    }

    #[test]
    fn test_pivot_requires_strict_extreme() {
        let mut pivots = PivotDetector::new(2, 2);
        let highs = [100.0, 105.0, 105.0, 102.0, 101.0];
        let mut last = (None, None);
        for (i, &h) in highs.iter().enumerate() {
            last = pivots.update(&bar(h, h - 1.0, h), i as u64);
        }
        assert!(last.0.is_none());
    }

    #[test]
    fn test_pivot_low_mirror() {
        let mut pivots = PivotDetector::new(1, 1);
        pivots.update(&bar(101.0, 100.0, 100.5), 0);
        pivots.update(&bar(99.0, 95.0, 96.0), 1);
        let (high, low) = pivots.update(&bar(100.0, 98.0, 99.0), 2);
        assert!(high.is_none());
        assert_eq!(
            low,
            Some(Pivot {
                price: 95.0,
                bar_index: 1
            })
        );
    }

    #[test]
    fn test_zone_geometry() {
        let mut registry = ZoneRegistry::new(1, 1, 2.0, 3);
        registry.update(&bar(101.0, 99.0, 100.0), 0);
        registry.update(&bar(110.0, 90.0, 100.0), 1);
        let events = registry.update(&bar(101.0, 99.0, 100.0), 2);

        assert_eq!(events.len(), 2);
        let supply = registry.zones(ZoneKind::Supply).next().copied().unwrap();
        assert!((supply.top - 110.0).abs() < 1e-10);
        assert!((supply.bottom - 108.0).abs() < 1e-10);
        assert_eq!(supply.pivot_bar_index, 1);
        assert_eq!(supply.created_bar_index, 2);

        let demand = registry.zones(ZoneKind::Demand).next().copied().unwrap();
        assert!((demand.bottom - 90.0).abs() < 1e-10);
        assert!((demand.top - 92.0).abs() < 1e-10);

        assert!(registry.contains_price(ZoneKind::Supply, 109.0));
        assert!(!registry.contains_price(ZoneKind::Supply, 100.0));
        assert!(registry.contains_price(ZoneKind::Demand, 91.0));
    }

    #[test]
    fn test_supply_invalidated_by_close_above_top() {
        let mut registry = ZoneRegistry::new(1, 1, 2.0, 3);
        registry.update(&flat(100.0), 0);
        registry.update(&bar(110.0, 100.0, 105.0), 1);
        registry.update(&flat(100.0), 2);
        assert_eq!(registry.count(ZoneKind::Supply), 1);

        let events = registry.update(&bar(110.0, 109.0, 110.0), 3);
        assert_eq!(registry.count(ZoneKind::Supply), 1);
        assert!(events.iter().all(|e| e.action != ZoneAction::Invalidated));

        let events = registry.update(&bar(111.0, 109.0, 110.5), 4);
        assert_eq!(registry.count(ZoneKind::Supply), 0);
        assert!(events
            .iter()
            .any(|e| e.action == ZoneAction::Invalidated && e.kind == ZoneKind::Supply));
    }

    #[test]
    fn test_fifo_eviction() {
        let mut registry = ZoneRegistry::new(1, 1, 0.5, 2);
        let mut evicted = Vec::new();
        // a fresh pivot high every other bar
        let highs = [100.0, 101.0, 100.0, 102.0, 100.0, 103.0, 100.0];
        for (i, &h) in highs.iter().enumerate() {
            let events = registry.update(&bar(h, 99.0 - i as f64, 99.5), i as u64);
            evicted.extend(
                events
                    .into_iter()
                    .filter(|e| e.action == ZoneAction::Evicted && e.kind == ZoneKind::Supply),
            );
            assert!(registry.count(ZoneKind::Supply) <= 2);
        }
        assert_eq!(registry.count(ZoneKind::Supply), 2);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].zone_id, 0);

        let tops: Vec<f64> = registry.zones(ZoneKind::Supply).map(|z| z.top).collect();
        assert_eq!(tops, vec![102.0, 103.0]);
    }
}
