/*!
General callbacks associated with a context.

# Callback types

Callbacks may be mutable functions.
Still, information passed from the core is non-mutable.
*/

use crate::blocking::checker::DirectBlockingChecker;

use super::GenericContext;

pub type CallbackValidation = dyn FnMut();

impl<C: DirectBlockingChecker> GenericContext<C> {
    pub fn set_callback_validation_started(&mut self, callback: Box<CallbackValidation>) {
        self.callback_validation_started = Some(callback);
    }

    pub fn set_callback_validation_finished(&mut self, callback: Box<CallbackValidation>) {
        self.callback_validation_finished = Some(callback);
    }

    pub fn check_callback_validation_started(&mut self) {
        if let Some(callback) = &mut self.callback_validation_started {
            callback()
        }
    }

    pub fn check_callback_validation_finished(&mut self) {
        if let Some(callback) = &mut self.callback_validation_finished {
            callback()
        }
    }
}
