//! One overlay per thread.
//!
//! Mounting while an overlay is alive does not create a second one; it only updates
//! the live overlay's editor protocol.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::editor::EditorProtocol;
use crate::host::Host;
use crate::interaction::{ClickToSource, OverlayOptions};
use crate::settings::SettingsStore;

trait LiveOverlay {
    fn set_editor_protocol(&mut self, protocol: EditorProtocol);
}

impl<H: Host, S: SettingsStore> LiveOverlay for ClickToSource<H, S> {
    fn set_editor_protocol(&mut self, protocol: EditorProtocol) {
        ClickToSource::set_editor_protocol(self, protocol);
    }
}

thread_local! {
    static MOUNTED: RefCell<Option<Weak<RefCell<dyn LiveOverlay>>>> = const { RefCell::new(None) };
}

fn live() -> Option<Rc<RefCell<dyn LiveOverlay>>> {
    MOUNTED.with(|slot| slot.borrow().as_ref().and_then(Weak::upgrade))
}

/// Owner of the mounted overlay; dropping it unmounts
pub struct OverlayHandle<H: Host + 'static, S: SettingsStore + 'static> {
    controller: Rc<RefCell<ClickToSource<H, S>>>,
}

impl<H: Host + 'static, S: SettingsStore + 'static> OverlayHandle<H, S> {
    pub fn controller(&self) -> &Rc<RefCell<ClickToSource<H, S>>> {
        &self.controller
    }

    pub fn unmount(self) {}
}

impl<H: Host + 'static, S: SettingsStore + 'static> Drop for OverlayHandle<H, S> {
    fn drop(&mut self) {
        let ours = Rc::as_ptr(&self.controller) as *const ();
        let _ = MOUNTED.try_with(|slot| {
            let mut slot = slot.borrow_mut();
            let is_ours = slot
                .as_ref()
                .is_some_and(|weak| weak.as_ptr() as *const () == ours);
            if is_ours {
                *slot = None;
                tracing::debug!("Overlay unmounted");
            }
        });
    }
}

pub enum Mounted<H: Host + 'static, S: SettingsStore + 'static> {
    Created(OverlayHandle<H, S>),
    /// An overlay was already mounted; only its editor protocol was updated
    Updated,
}

impl<H: Host + 'static, S: SettingsStore + 'static> Mounted<H, S> {
    pub fn into_handle(self) -> Option<OverlayHandle<H, S>> {
        match self {
            Mounted::Created(handle) => Some(handle),
            Mounted::Updated => None,
        }
    }
}

/// Mounts the overlay for this thread, or updates the one already mounted
pub fn mount<H, S>(options: OverlayOptions, store: S) -> Mounted<H, S>
where
    H: Host + 'static,
    S: SettingsStore + 'static,
{
    if let Some(existing) = live() {
        if let Some(protocol) = options.editor_protocol {
            match existing.try_borrow_mut() {
                Ok(mut overlay) => overlay.set_editor_protocol(protocol),
                Err(_) => tracing::warn!("Overlay busy, editor protocol not updated"),
            }
        }
        return Mounted::Updated;
    }

    let controller = Rc::new(RefCell::new(ClickToSource::new(options, store)));
    let shared: Rc<RefCell<dyn LiveOverlay>> = controller.clone();
    MOUNTED.with(|slot| *slot.borrow_mut() = Some(Rc::downgrade(&shared)));
    tracing::debug!("Overlay mounted");
    Mounted::Created(OverlayHandle { controller })
}

pub fn is_mounted() -> bool {
    live().is_some()
}

/// Updates the mounted overlay's editor protocol; false when nothing is mounted
pub fn set_editor_protocol(protocol: EditorProtocol) -> bool {
    let Some(existing) = live() else {
        return false;
    };
    let updated = match existing.try_borrow_mut() {
        Ok(mut overlay) => {
            overlay.set_editor_protocol(protocol);
            true
        }
        Err(_) => false,
    };
    updated
}
