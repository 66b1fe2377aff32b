// src/services/representative_service.rs

use crate::{
    client::ApiClient,
    common::error::AppError,
    models::representative::{
        Representative, RepresentativePayload, RepresentativeStatistics, RepresentativeStatus,
        StatusChange,
    },
    services::resource::ResourceList,
};

#[derive(Clone)]
pub struct RepresentativeService {
    client: ApiClient,
    resource: ResourceList<Representative>,
}

impl RepresentativeService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            resource: ResourceList::new("representantes", "/representatives"),
        }
    }

    pub async fn list(&self) -> Result<Vec<Representative>, AppError> {
        self.resource.fetch(&self.client).await
    }

    pub async fn get(&self, id: &str) -> Result<Representative, AppError> {
        Ok(self.client.get(&format!("/representatives/{id}")).await?)
    }

    // Estatísticas e lista de ativos vêm prontas do backend
    pub async fn statistics(&self) -> Result<RepresentativeStatistics, AppError> {
        Ok(self.client.get("/representatives/statistics").await?)
    }

    pub async fn active(&self) -> Result<Vec<Representative>, AppError> {
        Ok(self.client.get("/representatives/active").await?)
    }

    pub async fn create(&self, payload: &RepresentativePayload) -> Result<Representative, AppError> {
        let _guard = self.resource.begin_mutation()?;
        let representative: Representative = self.client.post("/representatives", payload).await?;
        tracing::info!("✅ Representante '{}' cadastrado", representative.name);
        Ok(representative)
    }

    pub async fn update(
        &self,
        id: &str,
        payload: &RepresentativePayload,
    ) -> Result<Representative, AppError> {
        let _guard = self.resource.begin_mutation()?;
        let representative: Representative = self
            .client
            .patch(&format!("/representatives/{id}"), payload)
            .await?;
        tracing::info!("Representante {} atualizado", id);
        Ok(representative)
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: RepresentativeStatus,
    ) -> Result<Representative, AppError> {
        let _guard = self.resource.begin_mutation()?;
        let representative: Representative = self
            .client
            .patch(
                &format!("/representatives/{id}/status"),
                &StatusChange { status },
            )
            .await?;
        tracing::info!("Representante {} agora está {:?}", id, status);
        Ok(representative)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.resource.begin_mutation()?;
        self.client.delete(&format!("/representatives/{id}")).await?;
        tracing::info!("Representante {} excluído", id);
        Ok(())
    }
}
