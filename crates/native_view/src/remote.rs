//! Remote handler proxies
//!
//! The remote engine implements handlers on its side and registers them as a
//! raw object pointer plus one of the `#[repr(C)]` tables below. The proxies
//! forward each handler call through the table and release the object when the
//! last reference to the proxy goes away.

use std::ffi::c_void;

use handle_bridge::{DropFn, RemoteOwned, RemoteTable};
use touch_input::Point;

use crate::drag_point::DragPoint;
use crate::handlers::{ClickHandler, LayoutHandler, MagnifyHandler, MultiDragHandler};

pub type OneDragFn = unsafe extern "C" fn(raw: *mut c_void, point: DragPoint);
pub type TwoDragsFn = unsafe extern "C" fn(raw: *mut c_void, first: DragPoint, second: DragPoint);

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MultiDragHandlerTable {
    pub on_one_drag_start: OneDragFn,
    pub on_one_drag_move: OneDragFn,
    pub on_one_drag_end: OneDragFn,
    pub on_two_drags_start: TwoDragsFn,
    pub on_two_drags_move: TwoDragsFn,
    pub on_two_drags_end: TwoDragsFn,
    pub drop: DropFn,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MagnifyHandlerTable {
    pub on_magnify: unsafe extern "C" fn(raw: *mut c_void, scale_change: f64, center: Point),
    pub drop: DropFn,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LayoutHandlerTable {
    pub on_layout: unsafe extern "C" fn(raw: *mut c_void, width: i64, height: i64),
    pub drop: DropFn,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ClickHandlerTable {
    pub on_click: unsafe extern "C" fn(raw: *mut c_void),
    pub drop: DropFn,
}

macro_rules! remote_table {
    ($($table:ty),* $(,)?) => {
        $(
            // SAFETY: the remote engine registers handlers that may be called
            // from the main thread and released from any thread
            unsafe impl RemoteTable for $table {
                fn drop_fn(&self) -> DropFn {
                    self.drop
                }
            }
        )*
    };
}

remote_table!(
    MultiDragHandlerTable,
    MagnifyHandlerTable,
    LayoutHandlerTable,
    ClickHandlerTable,
);

#[derive(Debug)]
pub struct RemoteMultiDragHandler(RemoteOwned<MultiDragHandlerTable>);

impl RemoteMultiDragHandler {
    /// # Safety
    ///
    /// See [`RemoteOwned::from_raw`].
    pub unsafe fn from_raw(raw: *mut c_void, table: MultiDragHandlerTable) -> Self {
        Self(RemoteOwned::from_raw(raw, table))
    }
}

impl MultiDragHandler for RemoteMultiDragHandler {
    fn on_one_drag_start(&self, point: DragPoint) {
        unsafe { (self.0.table().on_one_drag_start)(self.0.raw(), point) }
    }

    fn on_one_drag_move(&self, point: DragPoint) {
        unsafe { (self.0.table().on_one_drag_move)(self.0.raw(), point) }
    }

    fn on_one_drag_end(&self, point: DragPoint) {
        unsafe { (self.0.table().on_one_drag_end)(self.0.raw(), point) }
    }

    fn on_two_drags_start(&self, first: DragPoint, second: DragPoint) {
        unsafe { (self.0.table().on_two_drags_start)(self.0.raw(), first, second) }
    }

    fn on_two_drags_move(&self, first: DragPoint, second: DragPoint) {
        unsafe { (self.0.table().on_two_drags_move)(self.0.raw(), first, second) }
    }

    fn on_two_drags_end(&self, first: DragPoint, second: DragPoint) {
        unsafe { (self.0.table().on_two_drags_end)(self.0.raw(), first, second) }
    }
}

#[derive(Debug)]
pub struct RemoteMagnifyHandler(RemoteOwned<MagnifyHandlerTable>);

impl RemoteMagnifyHandler {
    /// # Safety
    ///
    /// See [`RemoteOwned::from_raw`].
    pub unsafe fn from_raw(raw: *mut c_void, table: MagnifyHandlerTable) -> Self {
        Self(RemoteOwned::from_raw(raw, table))
    }
}

impl MagnifyHandler for RemoteMagnifyHandler {
    fn on_magnify(&self, scale_change: f64, center: Point) {
        unsafe { (self.0.table().on_magnify)(self.0.raw(), scale_change, center) }
    }
}

#[derive(Debug)]
pub struct RemoteLayoutHandler(RemoteOwned<LayoutHandlerTable>);

impl RemoteLayoutHandler {
    /// # Safety
    ///
    /// See [`RemoteOwned::from_raw`].
    pub unsafe fn from_raw(raw: *mut c_void, table: LayoutHandlerTable) -> Self {
        Self(RemoteOwned::from_raw(raw, table))
    }
}

impl LayoutHandler for RemoteLayoutHandler {
    fn on_layout(&self, width: i64, height: i64) {
        unsafe { (self.0.table().on_layout)(self.0.raw(), width, height) }
    }
}

#[derive(Debug)]
pub struct RemoteClickHandler(RemoteOwned<ClickHandlerTable>);

impl RemoteClickHandler {
    /// # Safety
    ///
    /// See [`RemoteOwned::from_raw`].
    pub unsafe fn from_raw(raw: *mut c_void, table: ClickHandlerTable) -> Self {
        Self(RemoteOwned::from_raw(raw, table))
    }
}

impl ClickHandler for RemoteClickHandler {
    fn on_click(&self) {
        unsafe { (self.0.table().on_click)(self.0.raw()) }
    }
}
