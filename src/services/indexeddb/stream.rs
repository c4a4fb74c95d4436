// ============================================================================
// IDB STREAM - Puente eventos nativos -> Stream
// ============================================================================
// Contrato:
// - emite cero o más valores y luego completa, o emite un único Err y termina
// - soltar el stream (drop) quita los listeners que instaló; la petición
//   nativa NO se aborta (IndexedDB no permite cancelar una petición emitida)
// ============================================================================

use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{AbortHandle, Abortable};
use futures::{Stream, StreamExt, TryStreamExt};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

use super::error::IdbError;

type Item<T> = Result<T, IdbError>;

/// Lado emisor compartido por los closures de eventos
pub(crate) struct Emitter<T> {
    sender: Rc<RefCell<Option<UnboundedSender<Item<T>>>>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> Emitter<T> {
    /// Emitir un valor; devuelve false si el stream ya terminó
    pub fn next(&self, value: T) -> bool {
        match self.sender.borrow().as_ref() {
            Some(sender) => sender.unbounded_send(Ok(value)).is_ok(),
            None => false,
        }
    }

    /// Emitir error y cerrar. Solo el primero cuenta.
    pub fn error(&self, error: IdbError) {
        if let Some(sender) = self.sender.borrow_mut().take() {
            let _ = sender.unbounded_send(Err(error));
        }
    }

    pub fn complete(&self) {
        self.sender.borrow_mut().take();
    }
}

pub(crate) fn channel<T>() -> (Emitter<T>, UnboundedReceiver<Item<T>>) {
    let (sender, receiver) = mpsc::unbounded();
    let emitter = Emitter {
        sender: Rc::new(RefCell::new(Some(sender))),
    };
    (emitter, receiver)
}

struct Binding {
    target: EventTarget,
    event_type: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Listeners registrados con addEventListener; se quitan en Drop
#[derive(Default)]
pub(crate) struct ListenerGuard {
    bindings: Vec<Binding>,
}

impl ListenerGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen<T, F>(&mut self, target: &T, event_type: &'static str, handler: F) -> Result<(), IdbError>
    where
        T: AsRef<EventTarget>,
        F: FnMut(Event) + 'static,
    {
        let target: &EventTarget = target.as_ref();
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            .map_err(IdbError::Native)?;
        self.bindings.push(Binding {
            target: target.clone(),
            event_type,
            closure,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for binding in self.bindings.drain(..) {
            let _ = binding.target.remove_event_listener_with_callback(
                binding.event_type,
                binding.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

/// Stream de resultados de una operación IndexedDB
pub struct IdbStream<T> {
    receiver: UnboundedReceiver<Item<T>>,
    _listeners: ListenerGuard,
}

impl<T> IdbStream<T> {
    pub(crate) fn new(receiver: UnboundedReceiver<Item<T>>, listeners: ListenerGuard) -> Self {
        Self {
            receiver,
            _listeners: listeners,
        }
    }

    /// Stream que falla inmediatamente (error al preparar la petición)
    pub(crate) fn failed(error: IdbError) -> Self {
        let (emitter, receiver) = channel();
        emitter.error(error);
        Self::new(receiver, ListenerGuard::new())
    }

    /// Primer valor; el resto de eventos deja de observarse
    pub async fn first(mut self) -> Result<T, IdbError> {
        match self.next().await {
            Some(item) => item,
            None => Err(IdbError::Completed),
        }
    }

    /// Último valor, esperando la finalización
    pub async fn last(mut self) -> Result<T, IdbError> {
        let mut last = None;
        while let Some(item) = self.next().await {
            last = Some(item?);
        }
        last.ok_or(IdbError::Completed)
    }

    pub async fn collect_all(self) -> Result<Vec<T>, IdbError> {
        self.try_collect().await
    }

    /// Estilo observable: callbacks de valor, error y fin
    pub fn subscribe<N, E, C>(self, mut on_next: N, on_error: E, on_complete: C) -> Subscription
    where
        T: 'static,
        N: FnMut(T) + 'static,
        E: FnOnce(IdbError) + 'static,
        C: FnOnce() + 'static,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let mut stream = self;
        let task = Abortable::new(
            async move {
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(value) => on_next(value),
                        Err(error) => {
                            on_error(error);
                            return;
                        }
                    }
                }
                on_complete();
            },
            registration,
        );
        wasm_bindgen_futures::spawn_local(async move {
            let _ = task.await;
        });
        Subscription { handle }
    }
}

impl<T> Stream for IdbStream<T> {
    type Item = Item<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_next_unpin(cx)
    }
}

/// Suscripción activa creada con `IdbStream::subscribe`
pub struct Subscription {
    handle: AbortHandle,
}

impl Subscription {
    /// Deja de escuchar: el stream se suelta y sus listeners se quitan
    pub fn unsubscribe(&self) {
        self.handle.abort();
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.handle.is_aborted()
    }
}
