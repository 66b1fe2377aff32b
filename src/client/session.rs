// src/client/session.rs

use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use tokio::sync::RwLock;

/// Token de acesso do usuário logado.
///
/// Substitui o `localStorage` do navegador: é carregado do arquivo na
/// inicialização (`load`) e apagado no logout ou quando o backend responde 401
/// (`clear`). Clonar compartilha o mesmo token.
#[derive(Clone, Debug)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    path: Option<PathBuf>,
}

impl Session {
    // Sessão só em memória (usada nos testes)
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            path: None,
        }
    }

    /// Lê o token salvo, se existir. Arquivo ausente ou vazio = deslogado.
    pub async fn load(path: PathBuf) -> anyhow::Result<Self> {
        let token = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let trimmed = content.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if token.is_some() {
            tracing::info!("🔑 Token de acesso carregado de {}", path.display());
        }

        Ok(Self {
            token: Arc::new(RwLock::new(token)),
            path: Some(path),
        })
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn store(&self, token: String) -> anyhow::Result<()> {
        if let Some(path) = &self.path {
            tokio::fs::write(path, token.as_bytes()).await?;
        }
        *self.token.write().await = Some(token);
        Ok(())
    }

    /// Esquece o token. Falha ao apagar o arquivo só é logada.
    pub async fn clear(&self) {
        let had_token = self.token.write().await.take().is_some();

        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Falha ao remover {}: {}", path.display(), e),
            }
        }

        if had_token {
            tracing::warn!("Sessão encerrada, token removido.");
        }
    }
}
