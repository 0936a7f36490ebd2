use common_errors::{Validate, ValidationErrors};
use owner_models::Owner;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

const NAME_MAX_LEN: usize = 30;
const ADDRESS_MAX_LEN: usize = 255;
const CITY_MAX_LEN: usize = 80;
const TELEPHONE_MAX_DIGITS: usize = 12;

/// The five owner attributes a client may set. Missing keys and `null`
/// values decode as empty strings so they are reported by validation
/// rather than by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OwnerFields {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub telephone: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl OwnerFields {
    /// Overwrite exactly the mutable attributes of `owner`.
    pub fn apply_to(self, owner: &mut Owner) {
        owner.first_name = self.first_name;
        owner.last_name = self.last_name;
        owner.city = self.city;
        owner.address = self.address;
        owner.telephone = self.telephone;
    }
}

impl Validate for OwnerFields {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require_not_blank("firstName", &self.first_name);
        errors.require_max_len("firstName", &self.first_name, NAME_MAX_LEN);
        errors.require_not_blank("lastName", &self.last_name);
        errors.require_max_len("lastName", &self.last_name, NAME_MAX_LEN);
        errors.require_not_blank("address", &self.address);
        errors.require_max_len("address", &self.address, ADDRESS_MAX_LEN);
        errors.require_not_blank("city", &self.city);
        errors.require_max_len("city", &self.city, CITY_MAX_LEN);
        errors.require_not_blank("telephone", &self.telephone);
        errors.require_digits(
            "telephone",
            &self.telephone,
            TELEPHONE_MAX_DIGITS,
        );

        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOwnerCommand {
    #[serde(flatten)]
    pub fields: OwnerFields,
}

impl Validate for CreateOwnerCommand {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.fields.validate()
    }
}

impl From<CreateOwnerCommand> for Owner {
    fn from(command: CreateOwnerCommand) -> Self {
        let OwnerFields {
            first_name,
            last_name,
            address,
            city,
            telephone,
        } = command.fields;

        Self {
            id: None,
            first_name,
            last_name,
            address,
            city,
            telephone,
        }
    }
}

/// Any `id` in the body is ignored; the path identifies the owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOwnerCommand {
    #[serde(skip)]
    pub owner_id: i32,
    #[serde(flatten)]
    pub fields: OwnerFields,
}

impl Validate for UpdateOwnerCommand {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.fields.validate()
    }
}
