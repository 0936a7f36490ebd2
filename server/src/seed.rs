use database_traits::dao::Repository;
use owner_dao::OwnerRepository;
use owner_errors::OwnerError;
use owner_models::Owner;
use tracing::info;

const DEMO_OWNERS: [(&str, &str, &str, &str, &str); 10] = [
    ("George", "Franklin", "110 W. Liberty St.", "Madison", "6085551023"),
    ("Betty", "Davis", "638 Cardinal Ave.", "Sun Prairie", "6085551749"),
    ("Eduardo", "Rodriquez", "2693 Commerce St.", "McFarland", "6085558763"),
    ("Harold", "Davis", "563 Friendly St.", "Windsor", "6085553198"),
    ("Peter", "McTavish", "2387 S. Fair Way", "Madison", "6085552765"),
    ("Jean", "Coleman", "105 N. Lake St.", "Monona", "6085552654"),
    ("Jeff", "Black", "1450 Oak Blvd.", "Monona", "6085555387"),
    ("Maria", "Escobito", "345 Maple St.", "Madison", "6085557683"),
    ("David", "Schroeder", "2749 Blackhawk Trail", "Madison", "6085559435"),
    ("Carlos", "Estaban", "2335 Independence La.", "Waunakee", "6085555487"),
];

pub fn demo_owners() -> Vec<Owner> {
    DEMO_OWNERS
        .iter()
        .map(|&(first_name, last_name, address, city, telephone)| {
            Owner {
                id: None,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                address: address.to_string(),
                city: city.to_string(),
                telephone: telephone.to_string(),
            }
        })
        .collect()
}

/// Saves the demo owners unless the store already holds owners. Returns
/// how many were inserted.
pub async fn seed_demo_data(owners: &OwnerRepository) -> Result<usize, OwnerError> {
    if !owners.find_all().await?.is_empty() {
        info!("Owner store not empty, skipping demo data");
        return Ok(0);
    }

    let mut inserted = 0;
    for owner in demo_owners() {
        owners.save(owner).await?;
        inserted += 1;
    }
    info!("Seeded {} demo owners", inserted);

    Ok(inserted)
}
