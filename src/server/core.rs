use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::client::{ClientRegistry, handle_client};
use crate::config::{ServerConfig, SharedRuntimeConfig, StartupConfig};
use crate::error::RegistryError;
use crate::protocol::responses::{self, format_response};
use crate::students::StudentService;

pub struct Server {
    listener: TcpListener,
    registry: Arc<Mutex<ClientRegistry>>,
    service: Arc<StudentService>,
    startup: Arc<StartupConfig>,
    runtime: SharedRuntimeConfig,
}

impl Server {
    /// Builds the student service from configuration and binds the listener.
    pub async fn from_config(config: ServerConfig) -> Result<Self, RegistryError> {
        let service = StudentService::from_config(&config.startup)?;
        Self::bind(config, service).await
    }

    /// Binds the listener for an already constructed service.
    pub async fn bind(config: ServerConfig, service: StudentService) -> Result<Self, RegistryError> {
        let (startup, runtime) = config.split();
        let socket = startup.listen_socket();

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };

        Ok(Self {
            listener,
            registry: Arc::new(Mutex::new(ClientRegistry::new())),
            service: Arc::new(service),
            startup: Arc::new(startup),
            runtime,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr, RegistryError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn start(&self) {
        info!(
            "Starting student registry on {} (max {} clients)",
            self.startup.listen_socket(),
            self.runtime.read().await.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = Arc::clone(&self.registry);
                    let service = Arc::clone(&self.service);
                    let runtime = Arc::clone(&self.runtime);
                    let max_command_length = self.startup.max_command_length;

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_new_client(
                            stream,
                            addr,
                            registry,
                            service,
                            runtime,
                            max_command_length,
                        )
                        .await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Greets a new client, registers it, and hands off to the session handler.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    registry: Arc<Mutex<ClientRegistry>>,
    service: Arc<StudentService>,
    runtime: SharedRuntimeConfig,
    max_command_length: usize,
) -> Result<(), std::io::Error> {
    let max_clients = runtime.read().await.max_clients;

    {
        let mut clients = registry.lock().await;
        if !clients.try_insert(client_addr, max_clients) {
            warn!("Rejecting {}: {} clients connected", client_addr, clients.len());
            drop(clients);
            let reply = format_response(responses::TOO_MANY_CONNECTIONS, "Too many connections");
            stream.write_all(reply.as_bytes()).await?;
            return Ok(());
        }
        info!(
            "Accepted client: {} ({}/{} clients)",
            client_addr,
            clients.len(),
            max_clients
        );
    }

    let greeting = format_response(responses::READY, "Student registry ready");
    if let Err(e) = stream.write_all(greeting.as_bytes()).await {
        registry.lock().await.remove(&client_addr);
        return Err(e);
    }

    handle_client(stream, client_addr, registry, service, max_command_length).await;
    Ok(())
}
