//! SVM solver implementations
//!
//! The dual problem is handed to the generic projected gradient method in
//! [`crate::optim`] with the box and equality constraints of the soft-margin SVM.

pub mod dual;

pub use self::dual::*;
