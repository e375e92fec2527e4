use super::reference::ModalRef;
use leptos::prelude::*;
use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;

/// The private scope handed to a content unit.
///
/// It carries exactly two things: the handle of the modal hosting the unit
/// and the `data` payload from the open call (`None` when none was given).
pub struct ModalContext<D, R> {
    modal_ref: ModalRef<R>,
    data: Option<Arc<D>>,
}

impl<D, R> Clone for ModalContext<D, R> {
    fn clone(&self) -> Self {
        Self {
            modal_ref: self.modal_ref.clone(),
            data: self.data.clone(),
        }
    }
}

impl<D, R> ModalContext<D, R> {
    pub(crate) fn new(modal_ref: ModalRef<R>, data: Option<D>) -> Self {
        Self {
            modal_ref,
            data: data.map(Arc::new),
        }
    }

    pub fn modal_ref(&self) -> &ModalRef<R> {
        &self.modal_ref
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_deref()
    }
}

/// A content unit that can be mounted inside a modal.
///
/// `create` receives the private scope; the returned value lives for as long
/// as the modal is mounted and is what `ModalRef::component_instance` hands
/// back while the modal is open.
pub trait ModalComponent: Send + Sync + 'static {
    type Data: Send + Sync + 'static;
    type Output: Clone + Send + Sync + 'static;

    fn create(ctx: ModalContext<Self::Data, Self::Output>) -> Self
    where
        Self: Sized;

    fn render(self: Arc<Self>) -> AnyView;

    /// Actions shown in the chrome's footer slot when `show_footer` is set.
    fn render_footer(self: Arc<Self>) -> Option<AnyView> {
        None
    }

    /// Called once when the hosting modal is destroyed.
    fn on_destroy(&self) {}
}

type RenderFn = Arc<dyn Fn() -> AnyView + Send + Sync>;
type FooterFn = Arc<dyn Fn() -> Option<AnyView> + Send + Sync>;
type DestroyFn = Box<dyn FnOnce() + Send + Sync>;
type ContentFactory<D, R> = Arc<dyn Fn(ModalContext<D, R>) -> MountedContent + Send + Sync>;

/// An instantiated content unit, owned by its container.
pub struct MountedContent {
    name: Cow<'static, str>,
    instance: Arc<dyn Any + Send + Sync>,
    render: RenderFn,
    footer: Option<FooterFn>,
    on_destroy: Option<DestroyFn>,
}

impl MountedContent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn instance(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.instance
    }

    pub(crate) fn render_fn(&self) -> RenderFn {
        self.render.clone()
    }

    pub(crate) fn footer_fn(&self) -> Option<FooterFn> {
        self.footer.clone()
    }

    pub(crate) fn destroy(mut self) {
        if let Some(on_destroy) = self.on_destroy.take() {
            on_destroy();
        }
    }
}

/// Describes what to mount inside a modal.
///
/// Built from a [`ModalComponent`] type, from a view-building closure, or
/// left empty (the modal then shows its chrome only).
pub struct ModalContentType<D, R> {
    name: Cow<'static, str>,
    factory: Option<ContentFactory<D, R>>,
}

impl<D, R> Clone for ModalContentType<D, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            factory: self.factory.clone(),
        }
    }
}

impl<D, R> ModalContentType<D, R>
where
    D: Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    pub fn of<C>() -> Self
    where
        C: ModalComponent<Data = D, Output = R>,
    {
        let factory: ContentFactory<D, R> = Arc::new(|ctx| {
            let component = Arc::new(C::create(ctx));
            let render = {
                let component = component.clone();
                Arc::new(move || component.clone().render()) as RenderFn
            };
            let footer = {
                let component = component.clone();
                Arc::new(move || component.clone().render_footer()) as FooterFn
            };
            let on_destroy = {
                let component = component.clone();
                Box::new(move || component.on_destroy()) as DestroyFn
            };
            MountedContent {
                name: Cow::Borrowed(std::any::type_name::<C>()),
                instance: component,
                render,
                footer: Some(footer),
                on_destroy: Some(on_destroy),
            }
        });
        Self {
            name: Cow::Borrowed(std::any::type_name::<C>()),
            factory: Some(factory),
        }
    }

    /// Content described by a closure, re-run whenever the view is rendered.
    ///
    /// The linked instance is the [`ModalContext`] itself.
    pub fn from_fn<F>(name: impl Into<Cow<'static, str>>, builder: F) -> Self
    where
        F: Fn(ModalContext<D, R>) -> AnyView + Send + Sync + 'static,
    {
        let name = name.into();
        let builder = Arc::new(builder);
        let factory_name = name.clone();
        let factory: ContentFactory<D, R> = Arc::new(move |ctx| {
            let instance = Arc::new(ctx.clone());
            let builder = builder.clone();
            MountedContent {
                name: factory_name.clone(),
                instance,
                render: Arc::new(move || builder(ctx.clone())),
                footer: None,
                on_destroy: None,
            }
        });
        Self {
            name,
            factory: Some(factory),
        }
    }

    pub fn empty() -> Self {
        Self {
            name: Cow::Borrowed("empty"),
            factory: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.factory.is_none()
    }

    pub(crate) fn instantiate(&self, ctx: ModalContext<D, R>) -> Option<MountedContent> {
        self.factory.as_ref().map(|factory| factory(ctx))
    }
}
