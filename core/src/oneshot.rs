use std::cell::RefCell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Pending,
    Fired,
}

pub struct OneShot<N> {
    slots: RefCell<Vec<(N, Phase)>>,
}

impl<N: Clone + PartialEq> OneShot<N> {
    pub fn new(nodes: &[N]) -> Self {
        Self {
            slots: RefCell::new(nodes.iter().map(|node| (node.clone(), Phase::Pending)).collect()),
        }
    }

    pub fn fire(&self, node: &N) -> bool {
        let mut slots = self.slots.borrow_mut();
        let Some(slot) = slots.iter_mut().find(|(candidate, _)| candidate == node) else {
            return false;
        };
        if slot.1 == Phase::Fired {
            return false;
        }
        slot.1 = Phase::Fired;
        true
    }
}
