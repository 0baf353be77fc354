#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use volume_overlay::error::SurfaceError;
use volume_overlay::overlay::{PanelKind, Placement, Surface, SurfaceHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Attach(PanelKind),
    Detach(PanelKind),
}

/// Window-surface mock recording every attach/detach in order.
#[derive(Default)]
pub struct MockSurface {
    next_handle: u64,
    attached: HashMap<u64, PanelKind>,
    pub events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<SurfaceEvent>>> {
        self.events.clone()
    }

    pub fn attached_count(&self, panel: PanelKind) -> usize {
        self.attached.values().filter(|p| **p == panel).count()
    }
}

impl Surface for MockSurface {
    fn attach(&mut self, panel: PanelKind, _placement: Placement) -> Result<SurfaceHandle, SurfaceError> {
        if self.attached.values().any(|p| *p == panel) {
            return Err(SurfaceError::AlreadyAttached);
        }
        self.next_handle += 1;
        self.attached.insert(self.next_handle, panel);
        self.events.lock().unwrap().push(SurfaceEvent::Attach(panel));
        Ok(SurfaceHandle(self.next_handle))
    }

    fn detach(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        let Some(panel) = self.attached.remove(&handle.0) else {
            return Err(SurfaceError::AlreadyDetached);
        };
        self.events.lock().unwrap().push(SurfaceEvent::Detach(panel));
        Ok(())
    }
}
