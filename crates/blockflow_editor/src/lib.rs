// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive editing on top of `blockflow_graph`.
//!
//! ## Architecture
//!
//! Pointer input flows through explicit gesture state machines that emit
//! graph actions:
//! - `NodeDrag` moves a node by its header, snapping live
//! - `OutputDrag` and `InputDrag` preview and create or remove edges
//! - `ParamEdit` buffers text for a param until it is committed
//!
//! The [`Editor`] session owns the current graph, routes input to at most
//! one active gesture and is the only caller of the reducer.

pub mod gesture;
pub mod input;
pub mod session;

pub use gesture::{
    EditEvent, Gesture, GestureContext, InputDrag, NodeDrag, OutputDrag, ParamEdit,
    PointerEvent, Transition, VariantMenu,
};
pub use session::{Editor, FocusCallback};
