//! Typed API calls mirroring the dashboard's service layer

use uuid::Uuid;

use crate::{
    error::{ClientError, ClientResult},
    http::ApiClient,
    models::{
        AuthData, CreateVehicleRequest, LoginRequest, RegisterRequest, UpdateUserRequest,
        UpdateVehicleRequest, User, Vehicle,
    },
};

impl ApiClient {
    /// Register a new account and store the resulting session
    pub async fn register(&self, payload: &RegisterRequest) -> ClientResult<AuthData> {
        let envelope = self.post("/api/auth/register", payload).await?;
        let data: AuthData = envelope.data.ok_or(ClientError::MissingData)?;
        self.store()
            .set_auth(data.user.clone(), data.access_token.clone());
        Ok(data)
    }

    /// Login and store the resulting session
    pub async fn login(&self, payload: &LoginRequest) -> ClientResult<AuthData> {
        let envelope = self.post("/api/auth/login", payload).await?;
        let data: AuthData = envelope.data.ok_or(ClientError::MissingData)?;
        self.store()
            .set_auth(data.user.clone(), data.access_token.clone());
        Ok(data)
    }

    /// Logout server-side and clear the local session. The local session is
    /// cleared even if the server call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.post_empty::<serde_json::Value>("/api/auth/logout").await;
        self.store().logout();
        result.map(|_| ())
    }

    /// Fetch the current user and refresh the stored projection
    pub async fn me(&self) -> ClientResult<User> {
        let envelope = self.get("/api/auth/me").await?;
        let user: User = envelope.data.ok_or(ClientError::MissingData)?;
        self.store().set_user(user.clone());
        Ok(user)
    }

    /// List all vehicles
    pub async fn vehicles(&self) -> ClientResult<Vec<Vehicle>> {
        let envelope = self.get("/api/vehicles").await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Fetch a single vehicle
    pub async fn vehicle(&self, id: Uuid) -> ClientResult<Vehicle> {
        let envelope = self.get(&format!("/api/vehicles/{id}")).await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Create a vehicle (ADMIN)
    pub async fn create_vehicle(&self, payload: &CreateVehicleRequest) -> ClientResult<Vehicle> {
        let envelope = self.post("/api/vehicles", payload).await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Update a vehicle (ADMIN)
    pub async fn update_vehicle(
        &self,
        id: Uuid,
        payload: &UpdateVehicleRequest,
    ) -> ClientResult<Vehicle> {
        let envelope = self.put(&format!("/api/vehicles/{id}"), payload).await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Delete a vehicle (ADMIN)
    pub async fn delete_vehicle(&self, id: Uuid) -> ClientResult<()> {
        self.delete::<serde_json::Value>(&format!("/api/vehicles/{id}"))
            .await?;
        Ok(())
    }

    /// List all users (ADMIN)
    pub async fn users(&self) -> ClientResult<Vec<User>> {
        let envelope = self.get("/api/users").await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Create a user without logging in as them (ADMIN)
    pub async fn create_user(&self, payload: &RegisterRequest) -> ClientResult<User> {
        let envelope = self.post("/api/users", payload).await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Update a user (ADMIN)
    pub async fn update_user(&self, id: Uuid, payload: &UpdateUserRequest) -> ClientResult<User> {
        let envelope = self.put(&format!("/api/users/{id}"), payload).await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Delete a user (ADMIN)
    pub async fn delete_user(&self, id: Uuid) -> ClientResult<()> {
        self.delete::<serde_json::Value>(&format!("/api/users/{id}"))
            .await?;
        Ok(())
    }
}
