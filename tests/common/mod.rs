//! In-memory repositories shared by the integration tests.
//!
//! `InMemory` implements every repository trait over one mutex-guarded
//! `World`, so a test can seed rows, drive a service or the router, and
//! then inspect exactly what was persisted.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use boat_rental::config::MAX_IMAGES_PER_BOAT;
use boat_rental::domain::{
    Boat, BoatDetails, BoatFields, BoatFilter, BoatImage, City, Country, Credential, District,
    ImageChangeSet, IngestError, NewBoat, NewImage, NewUser, User, UserChanges, UserType,
};
use boat_rental::errors::{AppError, AppResult};
use boat_rental::infra::{
    BoatRepository, CredentialRepository, GeographyRepository, UnitOfWork, UserRepository,
};

#[derive(Default)]
pub struct World {
    pub users: Vec<User>,
    pub credentials: HashMap<Uuid, Credential>,
    pub boats: Vec<Boat>,
    pub images: Vec<BoatImage>,
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
    pub districts: Vec<District>,
}

#[derive(Clone, Default)]
pub struct InMemory {
    world: Arc<Mutex<World>>,
}

impl InMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap()
    }

    /// Seeds Türkiye > Muğla > Bodrum and returns the district id.
    pub fn seed_location(&self) -> Uuid {
        let mut world = self.world();
        let country = Country {
            id: Uuid::new_v4(),
            name: "Türkiye".to_string(),
        };
        let city = City {
            id: Uuid::new_v4(),
            country_id: country.id,
            name: "Muğla".to_string(),
        };
        let district = District {
            id: Uuid::new_v4(),
            city_id: city.id,
            name: "Bodrum".to_string(),
        };
        let district_id = district.id;
        world.countries.push(country);
        world.cities.push(city);
        world.districts.push(district);
        district_id
    }

    pub fn seed_user(&self, email: &str, user_type: UserType, credential: Credential) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Deniz Kaptan".to_string(),
            phone_number: None,
            user_type,
            created_at: now,
            updated_at: now,
        };
        let mut world = self.world();
        world.credentials.insert(user.id, credential);
        world.users.push(user.clone());
        user
    }

    /// Seeds a boat carrying `images` PNG images and returns its id.
    pub fn seed_boat(&self, owner_id: Uuid, district_id: Uuid, images: usize) -> Uuid {
        let now = Utc::now();
        let boat = Boat {
            id: Uuid::new_v4(),
            owner_id,
            fields: boat_fields(district_id),
            created_at: now,
            updated_at: now,
        };
        let id = boat.id;
        let mut world = self.world();
        world.boats.push(boat);
        for n in 0..images {
            world.images.push(BoatImage {
                id: Uuid::new_v4(),
                boat_id: id,
                content_type: "image/png".to_string(),
                data: vec![n as u8 + 1],
            });
        }
        id
    }

    pub fn image_ids(&self, boat_id: Uuid) -> Vec<Uuid> {
        self.world()
            .images
            .iter()
            .filter(|image| image.boat_id == boat_id)
            .map(|image| image.id)
            .collect()
    }

    fn details(world: &World, boat: &Boat) -> AppResult<BoatDetails> {
        let missing = |what: &str| AppError::consistency(format!("Boat {} has no {}", boat.id, what));

        let owner = world
            .users
            .iter()
            .find(|u| u.id == boat.owner_id)
            .ok_or_else(|| missing("owner"))?;
        let district = world
            .districts
            .iter()
            .find(|d| d.id == boat.fields.district_id)
            .ok_or_else(|| missing("district"))?;
        let city = world
            .cities
            .iter()
            .find(|c| c.id == district.city_id)
            .ok_or_else(|| missing("city"))?;
        let country = world
            .countries
            .iter()
            .find(|c| c.id == city.country_id)
            .ok_or_else(|| missing("country"))?;

        Ok(BoatDetails {
            boat: boat.clone(),
            owner_name: owner.name.clone(),
            owner_phone_number: owner.phone_number.clone(),
            district_name: district.name.clone(),
            city_id: city.id,
            city_name: city.name.clone(),
            country_id: country.id,
            country_name: country.name.clone(),
            images: world
                .images
                .iter()
                .filter(|image| image.boat_id == boat.id)
                .cloned()
                .collect(),
        })
    }

    fn attach(world: &mut World, boat_id: Uuid, images: Vec<NewImage>) {
        for image in images {
            world.images.push(BoatImage {
                id: Uuid::new_v4(),
                boat_id,
                content_type: image.content_type,
                data: image.data,
            });
        }
    }
}

pub fn boat_fields(district_id: Uuid) -> BoatFields {
    let from = Utc::now();
    BoatFields {
        name: "Blue Horizon".to_string(),
        description: "Gulet with six cabins".to_string(),
        price_per_hour: 450.0,
        capacity: 12,
        is_available: true,
        available_from: from,
        available_to: from + Duration::days(90),
        district_id,
    }
}

impl UnitOfWork for InMemory {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    fn credentials(&self) -> Arc<dyn CredentialRepository> {
        Arc::new(self.clone())
    }

    fn boats(&self) -> Arc<dyn BoatRepository> {
        Arc::new(self.clone())
    }

    fn geography(&self) -> Arc<dyn GeographyRepository> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl UserRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.world().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.world().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>> {
        Ok(self
            .world()
            .users
            .iter()
            .find(|u| u.phone_number.as_deref() == Some(phone_number))
            .cloned())
    }

    async fn create(&self, user: NewUser, credential: Credential) -> AppResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            phone_number: user.phone_number,
            user_type: user.user_type,
            created_at: now,
            updated_at: now,
        };
        let mut world = self.world();
        world.credentials.insert(user.id, credential);
        world.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut world = self.world();
        let user = world
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound)?;
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(phone_number) = changes.phone_number {
            user.phone_number = Some(phone_number);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut world = self.world();
        let before = world.users.len();
        world.users.retain(|u| u.id != id);
        if world.users.len() == before {
            return Err(AppError::NotFound);
        }

        world.credentials.remove(&id);
        let owned: Vec<Uuid> = world
            .boats
            .iter()
            .filter(|b| b.owner_id == id)
            .map(|b| b.id)
            .collect();
        world.boats.retain(|b| b.owner_id != id);
        world.images.retain(|image| !owned.contains(&image.boat_id));
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.world().users.clone())
    }
}

#[async_trait]
impl CredentialRepository for InMemory {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Credential>> {
        Ok(self.world().credentials.get(&user_id).cloned())
    }

    async fn replace(&self, user_id: Uuid, credential: Credential) -> AppResult<()> {
        match self.world().credentials.get_mut(&user_id) {
            Some(stored) => {
                *stored = credential;
                Ok(())
            }
            None => Err(AppError::consistency("No credential to replace")),
        }
    }
}

#[async_trait]
impl BoatRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BoatDetails>> {
        let world = self.world();
        match world.boats.iter().find(|b| b.id == id) {
            Some(boat) => Self::details(&world, boat).map(Some),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: BoatFilter) -> AppResult<Vec<BoatDetails>> {
        let world = self.world();
        let contains = |name: &str, term: &Option<String>| {
            term.as_ref()
                .map_or(true, |t| name.to_lowercase().contains(&t.to_lowercase()))
        };

        world
            .boats
            .iter()
            .map(|boat| Self::details(&world, boat))
            .filter(|details| match details {
                Ok(d) => {
                    let f = &d.boat.fields;
                    filter.min_capacity.map_or(true, |min| f.capacity >= min)
                        && filter.max_price.map_or(true, |max| f.price_per_hour <= max)
                        && contains(&d.city_name, &filter.city)
                        && contains(&d.district_name, &filter.district)
                }
                Err(_) => true,
            })
            .collect()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<BoatDetails>> {
        let world = self.world();
        world
            .boats
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .map(|boat| Self::details(&world, boat))
            .collect()
    }

    async fn create(&self, boat: NewBoat, images: Vec<NewImage>) -> AppResult<BoatDetails> {
        let now = Utc::now();
        let boat = Boat {
            id: Uuid::new_v4(),
            owner_id: boat.owner_id,
            fields: boat.fields,
            created_at: now,
            updated_at: now,
        };
        let mut world = self.world();
        Self::attach(&mut world, boat.id, images);
        world.boats.push(boat.clone());
        Self::details(&world, &boat)
    }

    async fn update(
        &self,
        id: Uuid,
        fields: BoatFields,
        images: ImageChangeSet,
    ) -> AppResult<BoatDetails> {
        let mut world = self.world();
        let position = world
            .boats
            .iter()
            .position(|b| b.id == id)
            .ok_or(AppError::NotFound)?;

        let current = world
            .images
            .iter()
            .filter(|image| image.boat_id == id && !images.remove.contains(&image.id))
            .count();
        let projected = current + images.add.len();
        if projected > MAX_IMAGES_PER_BOAT {
            return Err(IngestError::CapacityExceeded {
                projected,
                max: MAX_IMAGES_PER_BOAT,
            }
            .into());
        }

        world.boats[position].fields = fields;
        world.boats[position].updated_at = Utc::now();
        world
            .images
            .retain(|image| !(image.boat_id == id && images.remove.contains(&image.id)));
        Self::attach(&mut world, id, images.add);

        let boat = world.boats[position].clone();
        Self::details(&world, &boat)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut world = self.world();
        let before = world.boats.len();
        world.boats.retain(|b| b.id != id);
        if world.boats.len() == before {
            return Err(AppError::NotFound);
        }
        world.images.retain(|image| image.boat_id != id);
        Ok(())
    }
}

#[async_trait]
impl GeographyRepository for InMemory {
    async fn list_countries(&self) -> AppResult<Vec<Country>> {
        Ok(self.world().countries.clone())
    }

    async fn find_country(&self, id: Uuid) -> AppResult<Option<Country>> {
        Ok(self.world().countries.iter().find(|c| c.id == id).cloned())
    }

    async fn list_cities(&self, country_id: Uuid) -> AppResult<Vec<City>> {
        Ok(self
            .world()
            .cities
            .iter()
            .filter(|c| c.country_id == country_id)
            .cloned()
            .collect())
    }

    async fn find_city(&self, id: Uuid) -> AppResult<Option<City>> {
        Ok(self.world().cities.iter().find(|c| c.id == id).cloned())
    }

    async fn list_districts(&self, city_id: Uuid) -> AppResult<Vec<District>> {
        Ok(self
            .world()
            .districts
            .iter()
            .filter(|d| d.city_id == city_id)
            .cloned()
            .collect())
    }

    async fn find_district(&self, id: Uuid) -> AppResult<Option<District>> {
        Ok(self.world().districts.iter().find(|d| d.id == id).cloned())
    }
}
