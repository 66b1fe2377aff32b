// src/services/resource.rs

use std::{marker::PhantomData, sync::Arc};

use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, MutexGuard};

use crate::{client::ApiClient, common::error::AppError};

/// Lista de um recurso do backend.
///
/// Toda leitura busca a lista inteira de novo; a cópia só vive dentro da
/// requisição que a pediu. Assim nada sobra de outra sessão nem de mudanças
/// feitas por fora. Só uma mutação por recurso roda de cada vez; a segunda é
/// recusada em vez de enfileirada.
pub struct ResourceList<T> {
    name: &'static str,
    endpoint: &'static str,
    mutation: Arc<Mutex<()>>,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceList<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            endpoint: self.endpoint,
            mutation: self.mutation.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> ResourceList<T>
where
    T: DeserializeOwned,
{
    pub fn new(name: &'static str, endpoint: &'static str) -> Self {
        Self {
            name,
            endpoint,
            mutation: Arc::new(Mutex::new(())),
            _item: PhantomData,
        }
    }

    pub async fn fetch(&self, client: &ApiClient) -> Result<Vec<T>, AppError> {
        let fresh: Vec<T> = client.get(self.endpoint).await?;
        tracing::debug!("{}: {} registros carregados", self.name, fresh.len());
        Ok(fresh)
    }

    pub fn begin_mutation(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        self.mutation
            .try_lock()
            .map_err(|_| AppError::MutationInProgress(self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::Session, test_support::spawn_upstream};
    use axum::{routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    async fn counting_client() -> (ApiClient, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/things",
            get(move || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(json!([{ "n": n }]))
                }
            }),
        );
        let base = spawn_upstream(router).await;
        let client = ApiClient::new(&base, Duration::from_secs(5), Session::in_memory()).unwrap();
        (client, hits)
    }

    #[tokio::test]
    async fn every_read_sees_the_backend_state() {
        let (client, hits) = counting_client().await;
        let things: ResourceList<Value> = ResourceList::new("things", "/things");

        let first = things.fetch(&client).await.unwrap();
        let second = things.fetch(&client).await.unwrap();
        assert_eq!(first[0]["n"], 1);
        assert_eq!(second[0]["n"], 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_mutation_is_rejected_while_first_runs() {
        let things: ResourceList<Value> = ResourceList::new("things", "/things");

        let guard = things.begin_mutation().unwrap();
        assert!(matches!(
            things.begin_mutation(),
            Err(AppError::MutationInProgress("things"))
        ));
        drop(guard);
        assert!(things.begin_mutation().is_ok());
    }

    #[tokio::test]
    async fn clones_share_the_mutation_guard() {
        let things: ResourceList<Value> = ResourceList::new("things", "/things");
        let other = things.clone();

        let _guard = things.begin_mutation().unwrap();
        assert!(other.begin_mutation().is_err());
    }
}
