use database_traits::dao::Repository;
use owner_commands::{CreateOwnerCommand, UpdateOwnerCommand};
use owner_dao::OwnerRepository;
use owner_errors::OwnerError;
use owner_models::Owner;
use owner_responses::OwnerResponse;
use tracing::instrument;

#[derive(Clone)]
pub struct CreateOwnerHandler {
    owners: OwnerRepository,
}

impl CreateOwnerHandler {
    pub fn new(owners: OwnerRepository) -> Self { Self { owners } }

    #[instrument(skip_all)]
    pub async fn execute(
        &self, command: CreateOwnerCommand,
    ) -> Result<OwnerResponse, OwnerError> {
        let saved = self.owners.save(Owner::from(command)).await?;

        Ok(saved.into())
    }
}

#[derive(Clone)]
pub struct UpdateOwnerHandler {
    owners: OwnerRepository,
}

impl UpdateOwnerHandler {
    pub fn new(owners: OwnerRepository) -> Self { Self { owners } }

    /// Loads the owner, overwrites its five mutable fields and saves it.
    /// The identifier never changes.
    #[instrument(skip_all, fields(owner.id = command.owner_id))]
    pub async fn execute(
        &self, command: UpdateOwnerCommand,
    ) -> Result<OwnerResponse, OwnerError> {
        let owner_id = command.owner_id;
        let mut owner = self
            .owners
            .find_one(owner_id)
            .await?
            .ok_or(OwnerError::NotFound { owner_id })?;

        command.fields.apply_to(&mut owner);
        let saved = self.owners.save(owner).await?;

        Ok(saved.into())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use owner_commands::OwnerFields;
    use owner_dao::InMemoryOwnerDao;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;

    fn setup_test_handlers()
    -> (Arc<InMemoryOwnerDao>, CreateOwnerHandler, UpdateOwnerHandler) {
        let dao = Arc::new(InMemoryOwnerDao::new());
        let repository: OwnerRepository = dao.clone();
        (
            dao,
            CreateOwnerHandler::new(repository.clone()),
            UpdateOwnerHandler::new(repository),
        )
    }

    fn george() -> OwnerFields {
        OwnerFields {
            first_name: "George".to_string(),
            last_name: "Franklin".to_string(),
            address: "110 W. Liberty St.".to_string(),
            city: "Madison".to_string(),
            telephone: "6085551023".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_owner_handler() {
        let (dao, create_handler, _) = setup_test_handlers();

        let result = create_handler
            .execute(CreateOwnerCommand { fields: george() })
            .await
            .unwrap();

        assert_eq!(result.id, Some(1));
        assert_eq!(result.first_name, "George");
        assert_eq!(dao.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_owner_handler_merges_fields() {
        let (_dao, create_handler, update_handler) = setup_test_handlers();
        let created = create_handler
            .execute(CreateOwnerCommand { fields: george() })
            .await
            .unwrap();

        let mut fields = george();
        fields.city = "Monona".to_string();
        let updated = update_handler
            .execute(UpdateOwnerCommand {
                owner_id: created.id.unwrap(),
                fields,
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.city, "Monona");
        assert_eq!(updated.first_name, created.first_name);
        assert_eq!(updated.last_name, created.last_name);
        assert_eq!(updated.address, created.address);
        assert_eq!(updated.telephone, created.telephone);
    }

    #[tokio::test]
    async fn test_update_missing_owner() {
        let (dao, _, update_handler) = setup_test_handlers();

        let result = update_handler
            .execute(UpdateOwnerCommand {
                owner_id: 12,
                fields: george(),
            })
            .await;

        assert!(matches!(result, Err(OwnerError::NotFound { owner_id: 12 })));
        assert!(dao.is_empty().await);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn test_spans_omit_owner_contact_details() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_span_events(FmtSpan::NEW)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (_dao, create_handler, update_handler) = setup_test_handlers();
        let created = create_handler
            .execute(CreateOwnerCommand { fields: george() })
            .await
            .unwrap();
        update_handler
            .execute(UpdateOwnerCommand {
                owner_id: created.id.unwrap(),
                fields: george(),
            })
            .await
            .unwrap();

        let output = logs.text();
        assert!(output.contains("owner.id=1"));
        assert!(!output.contains("6085551023"));
        assert!(!output.contains("Liberty"));
    }
}
