//! Bootstrap data inserted when a table is found empty

use crate::models::{Asset, AssetStatus, ChannelType, Client, ClientStatus, Coordinates};

pub const SEED_CLIENT_COUNT: usize = 3;
pub const SEED_ASSET_COUNT: usize = 8;

#[allow(clippy::too_many_arguments)]
fn client(
    id: &str,
    name: &str,
    contact_person: &str,
    phone: &str,
    email: &str,
    address: &str,
    (assets_assigned, max_credit, active_credit): (i32, i32, i32),
    status: ClientStatus,
    image_src: &str,
    coordinates: Coordinates,
    channel_type: ChannelType,
    conserver_productivity: i32,
) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        contact_person: contact_person.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        address: address.to_string(),
        assets_assigned,
        max_credit,
        active_credit,
        status,
        image_src: image_src.to_string(),
        coordinates: Some(coordinates),
        channel_type,
        conserver_productivity,
        conserver: None,
    }
}

pub fn clients() -> Vec<Client> {
    vec![
        client(
            "CL-101",
            "Pescados Norte",
            "Juan Pérez",
            "555-123-4567",
            "contacto@pescadosnorte.mx",
            "Av. Marina 123, Puerto Vallarta",
            (3, 5, 3),
            ClientStatus::Active,
            "https://randomuser.me/api/portraits/men/1.jpg",
            Coordinates::new(-105.2333, 20.6167),
            ChannelType::Tradicional,
            85,
        ),
        client(
            "CL-102",
            "Mariscos Sur",
            "Ana González",
            "555-765-4321",
            "ana@mariscossur.mx",
            "Calle Oceano 456, Acapulco",
            (2, 3, 2),
            ClientStatus::Active,
            "https://randomuser.me/api/portraits/women/2.jpg",
            Coordinates::new(-99.8235, 16.8531),
            ChannelType::Moderno,
            92,
        ),
        client(
            "CL-103",
            "Hielos Centro",
            "Carlos Rodríguez",
            "555-987-6543",
            "carlos@hieloscentro.mx",
            "Av. Revolución 789, Ciudad de México",
            (1, 2, 1),
            ClientStatus::Inactive,
            "https://randomuser.me/api/portraits/men/3.jpg",
            Coordinates::new(-99.1332, 19.4326),
            ChannelType::Industrial,
            78,
        ),
    ]
}

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/{photo}?ixlib=rb-4.0.3&auto=format&fit=crop&w=900&q=60")
}

#[allow(clippy::too_many_arguments)]
fn asset(
    id: &str,
    model: &str,
    serial_number: &str,
    status: AssetStatus,
    location: &str,
    last_maintenance: &str,
    assigned_to: Option<&str>,
    capacity: &str,
    temperature_range: &str,
    photo: &str,
) -> Asset {
    Asset {
        id: id.to_string(),
        model: model.to_string(),
        serial_number: serial_number.to_string(),
        status,
        location: location.to_string(),
        last_maintenance: last_maintenance.to_string(),
        capacity: capacity.to_string(),
        temperature_range: temperature_range.to_string(),
        image_src: unsplash(photo),
        coordinates: None,
        assigned_to: assigned_to.map(str::to_string),
    }
}

pub fn assets() -> Vec<Asset> {
    use AssetStatus::*;

    vec![
        asset("CON-001", "Polar-3000XL", "P3XL-12345", Available, "Almacén Principal", "15/03/2023", None, "500L", "-18°C a -22°C", "photo-1562184552-997c461abbe6"),
        asset("CON-002", "Polar-1500M", "P15M-67890", InUse, "Cliente: Pescados Norte", "02/05/2023", Some("Pescados Norte"), "250L", "-15°C a -18°C", "photo-1596461010617-8549605ab3e3"),
        asset("CON-003", "Polar-2000M", "P2M-24680", Maintenance, "Taller Central", "10/01/2023", None, "300L", "-20°C a -25°C", "photo-1589096044321-9274646f36fa"),
        asset("CON-004", "Polar-1000S", "P1S-13579", Available, "Almacén Norte", "20/04/2023", None, "150L", "-15°C a -18°C", "photo-1594223274512-ad4803739b7c"),
        asset("CON-005", "Polar-3500XL", "P35XL-54321", InUse, "Cliente: Mariscos Sur", "05/02/2023", Some("Mariscos Sur"), "600L", "-22°C a -25°C", "photo-1595246007497-68ae3d6f44cc"),
        asset("CON-006", "Polar-2500L", "P25L-97531", Available, "Almacén Principal", "12/03/2023", None, "400L", "-18°C a -22°C", "photo-1584905066893-7d5c142ba4e1"),
        asset("CON-007", "Polar-1200S", "P12S-86420", Maintenance, "Taller Norte", "01/04/2023", None, "180L", "-15°C a -18°C", "photo-1588854337221-4cf9fa96059c"),
        asset("CON-008", "Polar-3000XL", "P3XL-65432", InUse, "Cliente: Hielos Centro", "18/02/2023", Some("Hielos Centro"), "500L", "-18°C a -22°C", "photo-1575663620136-5ebbfcc2c597"),
    ]
}
