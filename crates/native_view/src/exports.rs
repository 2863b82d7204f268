//! Exported method tables
//!
//! This is the whole surface the remote engine sees. Every entry takes the
//! bridge context pointer first, then the token of the object it acts on.
//! Objects returned to the remote side (registrations, strings) are new
//! tokens the remote side must release through that type's `drop` entry.
//!
//! Remote handler objects passed to an `add_*` entry are owned by the bridge
//! from that call on, even if the call fails; they are released through their
//! own table's `drop` entry.

use std::any::Any;
use std::ffi::c_void;
use std::sync::Arc;

use handle_bridge::{
    BridgeContext, BridgeError, Capability, HandlerRegistration, OpaqueToken, Owner, Registration,
    TypeDescriptor,
};

use crate::button::Button;
use crate::handlers::{
    ClickHandler, HasClickHandlers, HasLayoutHandlers, HasMagnifyHandlers, HasMultiDragHandlers,
    HasText, LayoutHandler, MagnifyHandler, MultiDragHandler,
};
use crate::remote::{
    ClickHandlerTable, LayoutHandlerTable, MagnifyHandlerTable, MultiDragHandlerTable,
    RemoteClickHandler, RemoteLayoutHandler, RemoteMagnifyHandler, RemoteMultiDragHandler,
};
use crate::view_handlers::ViewHandlers;

pub type ContextPtr = *const BridgeContext;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ContextTable {
    pub live_handles: unsafe extern "C" fn(ctx: ContextPtr) -> usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ViewTable {
    pub add_multi_drag_handler: unsafe extern "C" fn(
        ctx: ContextPtr,
        view: OpaqueToken,
        raw: *mut c_void,
        table: MultiDragHandlerTable,
    ) -> OpaqueToken,
    pub add_magnify_handler: unsafe extern "C" fn(
        ctx: ContextPtr,
        view: OpaqueToken,
        raw: *mut c_void,
        table: MagnifyHandlerTable,
    ) -> OpaqueToken,
    pub add_layout_handler: unsafe extern "C" fn(
        ctx: ContextPtr,
        view: OpaqueToken,
        raw: *mut c_void,
        table: LayoutHandlerTable,
    ) -> OpaqueToken,
    pub drop: unsafe extern "C" fn(ctx: ContextPtr, view: OpaqueToken),
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ButtonTable {
    pub get_text: unsafe extern "C" fn(ctx: ContextPtr, button: OpaqueToken) -> OpaqueToken,
    pub set_text:
        unsafe extern "C" fn(ctx: ContextPtr, button: OpaqueToken, text: *const u8, len: usize),
    pub add_click_handler: unsafe extern "C" fn(
        ctx: ContextPtr,
        button: OpaqueToken,
        raw: *mut c_void,
        table: ClickHandlerTable,
    ) -> OpaqueToken,
    pub drop: unsafe extern "C" fn(ctx: ContextPtr, button: OpaqueToken),
}

/// Strings handed to the remote side. The bytes stay valid until `drop`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct StringTable {
    pub ptr: unsafe extern "C" fn(ctx: ContextPtr, string: OpaqueToken) -> *const u8,
    pub len: unsafe extern "C" fn(ctx: ContextPtr, string: OpaqueToken) -> usize,
    pub drop: unsafe extern "C" fn(ctx: ContextPtr, string: OpaqueToken),
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RegistrationTable {
    pub deregister: unsafe extern "C" fn(ctx: ContextPtr, registration: OpaqueToken),
    pub drop: unsafe extern "C" fn(ctx: ContextPtr, registration: OpaqueToken),
}

/// Every table the remote engine gets at startup.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BridgeTables {
    pub ctx: ContextTable,
    pub view: ViewTable,
    pub button: ButtonTable,
    pub string: StringTable,
    pub registration: RegistrationTable,
}

pub const BRIDGE_TABLES: BridgeTables = BridgeTables {
    ctx: ContextTable {
        live_handles: ctx_live_handles,
    },
    view: ViewTable {
        add_multi_drag_handler: view_add_multi_drag_handler,
        add_magnify_handler: view_add_magnify_handler,
        add_layout_handler: view_add_layout_handler,
        drop: view_drop,
    },
    button: ButtonTable {
        get_text: button_get_text,
        set_text: button_set_text,
        add_click_handler: button_add_click_handler,
        drop: button_drop,
    },
    string: StringTable {
        ptr: string_ptr,
        len: string_len,
        drop: string_drop,
    },
    registration: RegistrationTable {
        deregister: registration_deregister,
        drop: registration_drop,
    },
};

const DESCRIPTORS: &[TypeDescriptor] = &[
    TypeDescriptor {
        name: "View",
        owner: Owner::Local,
        capabilities: &[
            Capability::HasMultiDragHandlers,
            Capability::HasMagnifyHandlers,
            Capability::HasLayoutHandlers,
            Capability::Drop,
        ],
    },
    TypeDescriptor {
        name: "Button",
        owner: Owner::Local,
        capabilities: &[Capability::HasText, Capability::HasClickHandlers, Capability::Drop],
    },
    TypeDescriptor {
        name: "String",
        owner: Owner::Local,
        capabilities: &[Capability::HasText, Capability::Drop],
    },
    TypeDescriptor {
        name: "HandlerRegistration",
        owner: Owner::Local,
        capabilities: &[Capability::HandlerRegistration, Capability::Drop],
    },
    TypeDescriptor {
        name: "MultiDragHandler",
        owner: Owner::Remote,
        capabilities: &[Capability::Drop],
    },
    TypeDescriptor {
        name: "MagnifyHandler",
        owner: Owner::Remote,
        capabilities: &[Capability::Drop],
    },
    TypeDescriptor {
        name: "LayoutHandler",
        owner: Owner::Remote,
        capabilities: &[Capability::Drop],
    },
    TypeDescriptor {
        name: "ClickHandler",
        owner: Owner::Remote,
        capabilities: &[Capability::Drop],
    },
];

/// Catalogue of bridged types and their capabilities.
pub fn describe() -> &'static [TypeDescriptor] {
    DESCRIPTORS
}

/// Run `op` against the context, logging failures and returning `fallback`.
unsafe fn guarded<R>(
    ctx: ContextPtr,
    name: &'static str,
    fallback: R,
    op: impl FnOnce(&BridgeContext) -> Result<R, BridgeError>,
) -> R {
    match BridgeContext::from_raw(ctx).and_then(op) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!("{} failed: {}", name, err);
            fallback
        }
    }
}

/// Release a token after checking it names a `T`.
unsafe fn drop_typed<T: Any + Send + Sync>(ctx: ContextPtr, name: &'static str, token: OpaqueToken) {
    guarded(ctx, name, (), |ctx| {
        ctx.resolve::<T>(token)?;
        ctx.drop_handle(token)
    })
}

fn export_registration(ctx: &BridgeContext, registration: Registration) -> OpaqueToken {
    ctx.export(Arc::new(registration))
}

unsafe extern "C" fn ctx_live_handles(ctx: ContextPtr) -> usize {
    guarded(ctx, "live_handles", 0, |ctx| Ok(ctx.live_handles()))
}

unsafe extern "C" fn view_add_multi_drag_handler(
    ctx: ContextPtr,
    view: OpaqueToken,
    raw: *mut c_void,
    table: MultiDragHandlerTable,
) -> OpaqueToken {
    let handler: Arc<dyn MultiDragHandler> = Arc::new(RemoteMultiDragHandler::from_raw(raw, table));
    guarded(ctx, "View.add_multi_drag_handler", OpaqueToken::NONE, |ctx| {
        let view = ctx.resolve::<ViewHandlers>(view)?;
        let registration = view.add_multi_drag_handler(handler)?;
        Ok(export_registration(ctx, registration))
    })
}

unsafe extern "C" fn view_add_magnify_handler(
    ctx: ContextPtr,
    view: OpaqueToken,
    raw: *mut c_void,
    table: MagnifyHandlerTable,
) -> OpaqueToken {
    let handler: Arc<dyn MagnifyHandler> = Arc::new(RemoteMagnifyHandler::from_raw(raw, table));
    guarded(ctx, "View.add_magnify_handler", OpaqueToken::NONE, |ctx| {
        let view = ctx.resolve::<ViewHandlers>(view)?;
        let registration = view.add_magnify_handler(handler)?;
        Ok(export_registration(ctx, registration))
    })
}

unsafe extern "C" fn view_add_layout_handler(
    ctx: ContextPtr,
    view: OpaqueToken,
    raw: *mut c_void,
    table: LayoutHandlerTable,
) -> OpaqueToken {
    let handler: Arc<dyn LayoutHandler> = Arc::new(RemoteLayoutHandler::from_raw(raw, table));
    guarded(ctx, "View.add_layout_handler", OpaqueToken::NONE, |ctx| {
        let view = ctx.resolve::<ViewHandlers>(view)?;
        let registration = view.add_layout_handler(handler)?;
        Ok(export_registration(ctx, registration))
    })
}

unsafe extern "C" fn view_drop(ctx: ContextPtr, view: OpaqueToken) {
    drop_typed::<ViewHandlers>(ctx, "View.drop", view);
}

unsafe extern "C" fn button_get_text(ctx: ContextPtr, button: OpaqueToken) -> OpaqueToken {
    guarded(ctx, "Button.get_text", OpaqueToken::NONE, |ctx| {
        let button = ctx.resolve::<Button>(button)?;
        Ok(ctx.export(Arc::new(button.text())))
    })
}

unsafe extern "C" fn button_set_text(ctx: ContextPtr, button: OpaqueToken, text: *const u8, len: usize) {
    let text = if text.is_null() || len == 0 {
        String::new()
    } else {
        String::from_utf8_lossy(std::slice::from_raw_parts(text, len)).into_owned()
    };
    guarded(ctx, "Button.set_text", (), |ctx| {
        ctx.resolve::<Button>(button)?.set_text(text);
        Ok(())
    })
}

unsafe extern "C" fn button_add_click_handler(
    ctx: ContextPtr,
    button: OpaqueToken,
    raw: *mut c_void,
    table: ClickHandlerTable,
) -> OpaqueToken {
    let handler: Arc<dyn ClickHandler> = Arc::new(RemoteClickHandler::from_raw(raw, table));
    guarded(ctx, "Button.add_click_handler", OpaqueToken::NONE, |ctx| {
        let button = ctx.resolve::<Button>(button)?;
        let registration = button.add_click_handler(handler)?;
        Ok(export_registration(ctx, registration))
    })
}

unsafe extern "C" fn button_drop(ctx: ContextPtr, button: OpaqueToken) {
    drop_typed::<Button>(ctx, "Button.drop", button);
}

unsafe extern "C" fn string_ptr(ctx: ContextPtr, string: OpaqueToken) -> *const u8 {
    guarded(ctx, "String.ptr", std::ptr::null(), |ctx| {
        // The context keeps the string alive until String.drop
        Ok(ctx.resolve::<String>(string)?.as_ptr())
    })
}

unsafe extern "C" fn string_len(ctx: ContextPtr, string: OpaqueToken) -> usize {
    guarded(ctx, "String.len", 0, |ctx| Ok(ctx.resolve::<String>(string)?.len()))
}

unsafe extern "C" fn string_drop(ctx: ContextPtr, string: OpaqueToken) {
    drop_typed::<String>(ctx, "String.drop", string);
}

unsafe extern "C" fn registration_deregister(ctx: ContextPtr, registration: OpaqueToken) {
    guarded(ctx, "HandlerRegistration.deregister", (), |ctx| {
        ctx.resolve::<Registration>(registration)?.deregister();
        Ok(())
    })
}

unsafe extern "C" fn registration_drop(ctx: ContextPtr, registration: OpaqueToken) {
    drop_typed::<Registration>(ctx, "HandlerRegistration.drop", registration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_descriptor_has_one_drop() {
        assert!(describe().iter().all(TypeDescriptor::is_well_formed));
    }

    #[test]
    fn test_local_types_are_described() {
        let names: Vec<&str> = describe()
            .iter()
            .filter(|d| d.owner == Owner::Local)
            .map(|d| d.name)
            .collect();

        assert_eq!(names, vec!["View", "Button", "String", "HandlerRegistration"]);
    }

    #[test]
    fn test_null_context_is_rejected() {
        let live = unsafe { (BRIDGE_TABLES.ctx.live_handles)(std::ptr::null()) };
        assert_eq!(live, 0);

        let text = unsafe { (BRIDGE_TABLES.button.get_text)(std::ptr::null(), OpaqueToken::from_raw(1)) };
        assert!(text.is_none());
    }
}
