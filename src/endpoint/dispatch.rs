use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc, oneshot};

use super::types::{Envelope, Reply, Request, Response};
use crate::ceremony::{Ceremony, SessionState};
use crate::error::{Error, Result};
use crate::service::Service;

/// Serve envelopes until every sender is dropped.
///
/// At most `max_workers` requests run at once. A worker slot is claimed
/// before the next envelope is taken off the queue, so once all slots are
/// busy the queue fills and `submit` waits.
pub async fn run_endpoint_loop<C: Ceremony + 'static>(
    mut incoming_rx: mpsc::Receiver<Envelope>,
    service: Arc<Service<C>>,
    max_workers: usize,
) {
    tracing::info!(max_workers, "Endpoint loop running");
    let workers = Arc::new(Semaphore::new(max_workers));

    loop {
        let Ok(permit) = workers.clone().acquire_owned().await else {
            break;
        };
        let Some(envelope) = incoming_rx.recv().await else {
            break;
        };
        let service = service.clone();
        // Handlers only block on the state mutex; keep them off the async workers.
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let Envelope {
                request,
                mut session,
                reply,
            } = envelope;
            let endpoint = request.endpoint();
            let result = dispatch_request(&service, request, &mut session);
            if let Err(e) = &result {
                tracing::debug!(endpoint, "Request failed: {e}");
            }
            if reply.send(Reply { session, result }).is_err() {
                tracing::warn!(endpoint, "Requester dropped before reply");
            }
        });
    }
    tracing::info!("Endpoint loop exiting (incoming channel closed)");
}

pub fn dispatch_request<C: Ceremony>(
    service: &Service<C>,
    request: Request,
    session: &mut SessionState,
) -> Result<Response> {
    tracing::debug!(endpoint = request.endpoint(), "Request");
    match request {
        Request::RegisterStart { name } => {
            service.register_start(&name, session).map(Response::Challenge)
        }
        Request::RegisterFinish {
            name,
            response,
            correlation,
        } => service
            .register_finish(&name, session, &response, correlation)
            .map(Response::Registered),
        Request::LoginStart { name } => service
            .login_start(name.as_deref(), session)
            .map(Response::Challenge),
        Request::LoginFinish { name, response } => service
            .login_finish(name.as_deref(), session, &response)
            .map(Response::Identified),
        Request::CheckStart => service.check_start(session).map(Response::Challenge),
        Request::CheckFinish { response } => service
            .check_finish(session, &response)
            .map(Response::Identified),
    }
}

/// Send one request into the loop and wait for its reply.
pub async fn submit(
    tx: &mpsc::Sender<Envelope>,
    request: Request,
    session: SessionState,
) -> Result<Reply> {
    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(Envelope {
        request,
        session,
        reply: reply_tx,
    })
    .await
    .map_err(|_| Error::Internal("endpoint loop closed".into()))?;
    reply_rx
        .await
        .map_err(|_| Error::Internal("endpoint worker dropped the request".into()))
}
