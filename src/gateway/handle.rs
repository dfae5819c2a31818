use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::store::OpKind;

use super::GatewayError;

/// Observable phase of an issued operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpStatus {
    Pending,
    Fulfilled,
    Rejected(String),
}

impl OpStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, OpStatus::Pending)
    }
}

/// Handle to an in-flight gateway operation.
///
/// Await it for the result, or poll [`status`](OpHandle::status). Dropping
/// the handle does not cancel the operation; its result is still applied
/// to the store.
pub struct OpHandle<T> {
    id: u64,
    kind: OpKind,
    status: watch::Receiver<OpStatus>,
    join: JoinHandle<Result<T, GatewayError>>,
}

impl<T> OpHandle<T> {
    pub(crate) fn new(
        id: u64,
        kind: OpKind,
        status: watch::Receiver<OpStatus>,
        join: JoinHandle<Result<T, GatewayError>>,
    ) -> Self {
        OpHandle {
            id,
            kind,
            status,
            join,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> OpKind {
        self.kind
    }

    pub fn status(&self) -> OpStatus {
        self.status.borrow().clone()
    }
}

impl<T> Future for OpHandle<T> {
    type Output = Result<T, GatewayError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.join).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(GatewayError::Aborted(this.kind))),
            Poll::Pending => Poll::Pending,
        }
    }
}
