//! Offline catalog for running without a database.

use pooja_search::mocks::InMemorySearchBackend;
use pooja_search::{PoojaHit, PunditHit, TempleHit};
use std::time::Duration;

/// In-memory marketplace with a little latency so loading states show up
pub fn demo_backend() -> InMemorySearchBackend {
    InMemorySearchBackend::new()
        .with_poojas([
            PoojaHit::new("p1", "Ganesh Chaturthi Pooja")
                .with_description("Welcome Lord Ganesh home for the festival")
                .with_category("Festival"),
            PoojaHit::new("p2", "Ganesh Havan").with_category("Havan"),
            PoojaHit::new("p3", "Satyanarayan Katha").with_category("Katha"),
            PoojaHit::new("p4", "Rudrabhishek")
                .with_description("Abhishek of Lord Shiva with panchamrit")
                .with_category("Shiva"),
            PoojaHit::new("p5", "Lakshmi Pooja").with_category("Festival"),
            PoojaHit::new("p6", "Griha Pravesh").with_category("Home"),
        ])
        .with_temples([
            TempleHit::new("t1", "Shrimant Dagdusheth Halwai Ganpati").located("Pune", "Maharashtra"),
            TempleHit::new("t2", "Siddhivinayak Temple").located("Mumbai", "Maharashtra"),
            TempleHit::new("t3", "Kashi Vishwanath").located("Varanasi", "Uttar Pradesh"),
            TempleHit::new("t4", "Mahakaleshwar Jyotirlinga").located("Ujjain", "Madhya Pradesh"),
        ])
        .with_pundits([
            PunditHit::new("u1", "Pandit Ramesh Shastri")
                .with_location("Varanasi")
                .with_specialization("Rudrabhishek"),
            PunditHit::new("u2", "Acharya Vinod Mishra")
                .with_location("Pune")
                .with_specialization("Ganesh Pooja"),
            PunditHit::new("u3", "Pandit Suresh Joshi")
                .with_location("Ujjain")
                .with_specialization("Kaal Sarp Dosh"),
        ])
        .deactivate("p6")
        .with_latency(Duration::from_millis(150))
}
