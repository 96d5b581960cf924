use tonic::transport::Channel;
use uuid::Uuid;

use prizeflow_proto::directory::{
    GetCompetitionRequest, GetOrCreateUserRequest, directory_service_client::DirectoryServiceClient,
};

use crate::domain::repository::DirectoryPort;
use crate::domain::types::{Competition, DirectoryUser};
use crate::error::RewardsServiceError;

#[derive(Clone)]
pub struct GrpcDirectoryPort {
    client: DirectoryServiceClient<Channel>,
}

impl GrpcDirectoryPort {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: DirectoryServiceClient::new(channel),
        }
    }
}

impl DirectoryPort for GrpcDirectoryPort {
    async fn get_or_create_user(
        &self,
        phone: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<DirectoryUser, RewardsServiceError> {
        let response = self
            .client
            .clone()
            .get_or_create_user(GetOrCreateUserRequest {
                phone: phone.to_owned(),
                name: name.map(str::to_owned),
                email: email.map(str::to_owned),
            })
            .await
            .map_err(|e| anyhow::anyhow!("gRPC get_or_create_user failed: {e}"))?;
        response.into_inner().try_into()
    }

    async fn get_competition(&self, id: Uuid) -> Result<Option<Competition>, RewardsServiceError> {
        let response = self
            .client
            .clone()
            .get_competition(GetCompetitionRequest {
                competition_id: id.to_string(),
            })
            .await;
        match response {
            Ok(resp) => Ok(Some(resp.into_inner().try_into()?)),
            Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!("gRPC get_competition failed: {e}").into()),
        }
    }
}

impl TryFrom<prizeflow_proto::directory::User> for DirectoryUser {
    type Error = RewardsServiceError;

    fn try_from(user: prizeflow_proto::directory::User) -> Result<Self, Self::Error> {
        let id = user
            .id
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid user UUID from directory service"))?;
        Ok(DirectoryUser {
            id,
            phone: user.phone,
            name: user.name,
            email: user.email,
        })
    }
}

impl TryFrom<prizeflow_proto::directory::Competition> for Competition {
    type Error = RewardsServiceError;

    fn try_from(competition: prizeflow_proto::directory::Competition) -> Result<Self, Self::Error> {
        let id = competition
            .id
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid competition UUID from directory service"))?;
        Ok(Competition {
            id,
            name: competition.name,
            is_active: competition.is_active,
        })
    }
}
