//! Sample records loaded into a freshly seeded store

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::identity::EntityId;
use crate::entities::client::Client;
use crate::entities::project::{Company, Environment, Extra, Project, ProjectStatus};
use crate::entities::seller::Seller;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

fn extra(id: &str, name: &str, quantity: u32) -> Extra {
    Extra {
        id: EntityId::from(id),
        name: name.to_string(),
        quantity,
    }
}

pub fn clients() -> Vec<Client> {
    vec![
        Client {
            id: EntityId::from("1"),
            name: "Maria Silva".to_string(),
            phone: "(11) 99999-1234".to_string(),
            email: "maria.silva@email.com".to_string(),
            address: Some("Rua das Flores, 123 - São Paulo, SP".to_string()),
            created_at: midnight(2024, 1, 15),
        },
        Client {
            id: EntityId::from("2"),
            name: "João Santos".to_string(),
            phone: "(11) 98888-5678".to_string(),
            email: "joao.santos@email.com".to_string(),
            address: Some("Av. Paulista, 1000 - São Paulo, SP".to_string()),
            created_at: midnight(2024, 2, 20),
        },
        Client {
            id: EntityId::from("3"),
            name: "Ana Oliveira".to_string(),
            phone: "(11) 97777-9012".to_string(),
            email: "ana.oliveira@email.com".to_string(),
            address: None,
            created_at: midnight(2024, 3, 10),
        },
    ]
}

pub fn sellers() -> Vec<Seller> {
    let seller = |id: &str, name: &str, email: &str, phone: &str| Seller {
        id: EntityId::from(id),
        name: name.to_string(),
        email: email.to_string(),
        phone: Some(phone.to_string()),
    };

    vec![
        seller("1", "Carlos Mendes", "carlos@empresa.com", "(11) 91111-1111"),
        seller("2", "Fernanda Lima", "fernanda@empresa.com", "(11) 92222-2222"),
        seller("3", "Roberto Alves", "roberto@empresa.com", "(11) 93333-3333"),
    ]
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: EntityId::from("1"),
            name: "Reforma Cozinha Completa".to_string(),
            client_id: EntityId::from("1"),
            company: Company::Caza43,
            seller_id: EntityId::from("1"),
            status: ProjectStatus::InProgress,
            observations: Some("Cliente prefere tons claros".to_string()),
            environments: vec![Environment::Kitchen],
            measurement_date: Some(date(2024, 1, 20)),
            measurement_deadline: Some(date(2024, 2, 15)),
            delivery_address: Some("Rua das Flores, 123 - São Paulo, SP".to_string()),
            appliances: Some("Fogão cooktop, Geladeira duplex, Microondas embutido".to_string()),
            extras: vec![extra("1", "Puxadores especiais", 12)],
            measurements: Vec::new(),
            images: Vec::new(),
            files: Vec::new(),
            created_at: midnight(2024, 1, 15),
            updated_at: midnight(2024, 1, 20),
        },
        Project {
            id: EntityId::from("2"),
            name: "Projeto Quarto Suíte".to_string(),
            client_id: EntityId::from("2"),
            company: Company::Soho,
            seller_id: EntityId::from("2"),
            status: ProjectStatus::Finished,
            observations: None,
            environments: vec![Environment::Bedroom, Environment::Bathroom],
            measurement_date: Some(date(2024, 2, 25)),
            measurement_deadline: Some(date(2024, 3, 20)),
            delivery_address: None,
            appliances: None,
            extras: Vec::new(),
            measurements: Vec::new(),
            images: Vec::new(),
            files: Vec::new(),
            created_at: midnight(2024, 2, 20),
            updated_at: midnight(2024, 3, 25),
        },
        Project {
            id: EntityId::from("3"),
            name: "Área Gourmet Premium".to_string(),
            client_id: EntityId::from("3"),
            company: Company::Elias,
            seller_id: EntityId::from("3"),
            status: ProjectStatus::InProgress,
            observations: None,
            environments: vec![Environment::Barbecue, Environment::SocialArea],
            measurement_date: None,
            measurement_deadline: None,
            delivery_address: None,
            appliances: Some("Churrasqueira a gás, Adega climatizada".to_string()),
            extras: vec![
                extra("1", "Bancada de mármore", 1),
                extra("2", "Iluminação LED", 8),
            ],
            measurements: Vec::new(),
            images: Vec::new(),
            files: Vec::new(),
            created_at: midnight(2024, 3, 10),
            updated_at: midnight(2024, 3, 15),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids() {
        let ids: Vec<String> = clients().iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(sellers().len(), 3);
        assert_eq!(projects().len(), 3);
    }

    #[test]
    fn test_seed_dates() {
        let p = &projects()[1];
        assert_eq!(p.created_at.to_rfc3339(), "2024-02-20T00:00:00+00:00");
        assert_eq!(p.measurement_deadline, Some(date(2024, 3, 20)));
    }

    #[test]
    fn test_seed_extras_have_local_ids() {
        let p = &projects()[2];
        let ids: Vec<&str> = p.extras.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }
}
