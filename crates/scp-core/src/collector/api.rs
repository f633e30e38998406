// Upstream API seams for the collectors.
//
// The collectors only see these traits; the real clients from `scp_api`
// implement them by fetching and converting into domain types.

use std::future::Future;

use scp_api::{Error, ScpClient, SoapClient};

use crate::model::{MaintenanceWindow, Server, ServerListEntry, Task, VServer};

/// Read-only view of the REST API used by [`ScpCollector`](super::ScpCollector).
pub trait ServerControlApi: Send + Sync {
    /// Succeeds only on an exact `200 OK` liveness response.
    fn ping(&self) -> impl Future<Output = Result<(), Error>> + Send;

    fn maintenance(&self) -> impl Future<Output = Result<MaintenanceWindow, Error>> + Send;

    fn list_servers(&self) -> impl Future<Output = Result<Vec<ServerListEntry>, Error>> + Send;

    /// Server detail including live hypervisor information.
    fn get_server(&self, id: i64) -> impl Future<Output = Result<Server, Error>> + Send;

    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, Error>> + Send;
}

/// Read-only view of the SOAP API used by [`LegacyCollector`](super::LegacyCollector).
pub trait LegacyServerControlApi: Send + Sync {
    fn get_vservers(&self) -> impl Future<Output = Result<Vec<String>, Error>> + Send;

    fn get_vserver_information(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<VServer, Error>> + Send;
}

impl ServerControlApi for ScpClient {
    async fn ping(&self) -> Result<(), Error> {
        ScpClient::ping(self).await
    }

    async fn maintenance(&self) -> Result<MaintenanceWindow, Error> {
        ScpClient::maintenance(self).await.map(Into::into)
    }

    async fn list_servers(&self) -> Result<Vec<ServerListEntry>, Error> {
        let servers = ScpClient::list_servers(self).await?;
        Ok(servers.into_iter().map(Into::into).collect())
    }

    async fn get_server(&self, id: i64) -> Result<Server, Error> {
        ScpClient::get_server(self, id).await.map(Into::into)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, Error> {
        let tasks = ScpClient::list_tasks(self).await?;
        Ok(tasks.into_iter().map(Into::into).collect())
    }
}

impl LegacyServerControlApi for SoapClient {
    async fn get_vservers(&self) -> Result<Vec<String>, Error> {
        SoapClient::get_vservers(self).await
    }

    async fn get_vserver_information(&self, name: &str) -> Result<VServer, Error> {
        SoapClient::get_vserver_information(self, name)
            .await
            .map(Into::into)
    }
}
