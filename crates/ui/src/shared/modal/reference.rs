use super::lock;
use ds_contracts::modal::{ModalId, ModalState};
use std::any::Any;
use std::sync::{Arc, Mutex, Weak};

type AfterClosed<R> = Box<dyn FnOnce(Option<R>) + Send>;
type TeardownHook = Box<dyn FnOnce() + Send>;

struct RefState<R> {
    state: ModalState,
    result: Option<R>,
    after_closed: Option<AfterClosed<R>>,
    instance: Option<Weak<dyn Any + Send + Sync>>,
    teardown: Option<TeardownHook>,
}

pub(crate) struct RefInner<R> {
    id: ModalId,
    state: Mutex<RefState<R>>,
}

/// Handle to one opened modal, returned by `open`.
///
/// Cloning is cheap; every clone observes the same lifecycle. The content
/// unit receives one through its [`ModalContext`](super::ModalContext) and
/// calls [`close`](Self::close) when it is done.
pub struct ModalRef<R> {
    inner: Arc<RefInner<R>>,
}

impl<R> Clone for ModalRef<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R> std::fmt::Debug for ModalRef<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalRef")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .finish()
    }
}

impl<R> ModalRef<R> {
    pub(crate) fn new(id: ModalId) -> Self {
        Self {
            inner: Arc::new(RefInner {
                id,
                state: Mutex::new(RefState {
                    state: ModalState::Opening,
                    result: None,
                    after_closed: None,
                    instance: None,
                    teardown: None,
                }),
            }),
        }
    }

    pub(crate) fn inner(&self) -> &Arc<RefInner<R>> {
        &self.inner
    }

    pub fn id(&self) -> &ModalId {
        &self.inner.id
    }

    pub fn state(&self) -> ModalState {
        self.inner.state()
    }

    /// Both handles point at the same modal.
    pub fn ptr_eq(&self, other: &ModalRef<R>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Live content instance, if it is still mounted and of type `T`.
    ///
    /// The link is weak: it never keeps the instance alive and yields `None`
    /// once the modal reached `Closed`.
    pub fn component_instance<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let guard = lock(&self.inner.state);
        if guard.state == ModalState::Closed {
            return None;
        }
        let instance = guard.instance.as_ref()?.upgrade()?;
        drop(guard);
        instance.downcast::<T>().ok()
    }

    /// Point the instance link at `instance`.
    pub fn set_component_instance<T: Any + Send + Sync>(&self, instance: &Arc<T>) {
        let erased: Arc<dyn Any + Send + Sync> = instance.clone();
        self.link_instance(&erased);
    }

    pub(crate) fn link_instance(&self, instance: &Arc<dyn Any + Send + Sync>) {
        let mut guard = lock(&self.inner.state);
        if guard.state == ModalState::Closed {
            log::warn!(
                "Ignoring instance link for closed modal '{}'",
                self.inner.id
            );
            return;
        }
        guard.instance = Some(Arc::downgrade(instance));
    }

    pub(crate) fn mark_open(&self) {
        self.inner.advance(ModalState::Open);
    }
}

impl<R: Clone + Send + 'static> ModalRef<R> {
    /// Close the modal with an optional result.
    ///
    /// Only the first call has any effect: it stores `result`, moves the
    /// modal to `Closing`, notifies the [`after_closed`](Self::after_closed)
    /// callback and hands the modal to the manager for teardown. Later calls
    /// are ignored.
    pub fn close(&self, result: Option<R>) {
        if self.raw_close(result) {
            let hook = lock(&self.inner.state).teardown.take();
            if let Some(hook) = hook {
                hook();
            }
        }
    }

    pub fn close_with(&self, result: R) {
        self.close(Some(result));
    }

    /// Close without a result (cancel).
    pub fn dismiss(&self) {
        self.close(None);
    }

    /// Register the completion callback.
    ///
    /// One slot per modal: a later registration replaces an earlier one. If
    /// the modal is already closing the callback runs right away with the
    /// stored result.
    pub fn after_closed<F>(&self, callback: F)
    where
        F: FnOnce(Option<R>) + Send + 'static,
    {
        let mut guard = lock(&self.inner.state);
        if guard.state.is_closing_or_closed() {
            let result = guard.result.clone();
            drop(guard);
            callback(result);
            return;
        }
        guard.after_closed = Some(Box::new(callback));
    }

    /// The value passed to `close`, once closed.
    pub fn result(&self) -> Option<R> {
        lock(&self.inner.state).result.clone()
    }

    /// Logical close: result, state and callback. Returns `false` when the
    /// modal was already closing.
    pub(crate) fn raw_close(&self, result: Option<R>) -> bool {
        let mut guard = lock(&self.inner.state);
        if guard.state.is_closing_or_closed() {
            log::debug!("Modal '{}' is already {}", self.inner.id, guard.state);
            return false;
        }
        guard.result = result;
        guard.state = ModalState::Closing;
        let callback = guard.after_closed.take();
        let delivered = guard.result.clone();
        drop(guard);

        if let Some(callback) = callback {
            callback(delivered);
        }
        true
    }

    /// Install the manager's teardown. Runs at once if `close` already
    /// happened (content that closed itself while being created).
    pub(crate) fn install_teardown(&self, hook: TeardownHook) {
        let mut guard = lock(&self.inner.state);
        if guard.state.is_closing_or_closed() {
            drop(guard);
            hook();
            return;
        }
        guard.teardown = Some(hook);
    }
}

impl<R> RefInner<R> {
    pub(crate) fn state(&self) -> ModalState {
        lock(&self.state).state
    }

    pub(crate) fn advance(&self, next: ModalState) -> bool {
        let mut guard = lock(&self.state);
        if guard.state.can_advance_to(next) {
            guard.state = next;
            if next == ModalState::Closed {
                guard.instance = None;
                guard.teardown = None;
            }
            true
        } else {
            false
        }
    }
}
