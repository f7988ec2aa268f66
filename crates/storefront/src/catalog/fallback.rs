//! Embedded product dataset served while the catalog service is unreachable.

use techsphere_core::{Badge, Category, Price, Product, ProductId};

struct Seed {
    id: &'static str,
    name: &'static str,
    category: Category,
    price: u32,
    old_price: Option<u32>,
    rating: f64,
    reviews: u32,
    image: &'static str,
    badge: Option<Badge>,
    description: &'static str,
    stock: u32,
}

const SEEDS: [Seed; 6] = [
    Seed {
        id: "1",
        name: "Notebook Gamer Predator RTX 4080",
        category: Category::Notebooks,
        price: 12_499,
        old_price: Some(14_999),
        rating: 4.5,
        reviews: 24,
        image: "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?auto=format&fit=crop&w=1171&q=80",
        badge: Some(Badge::New),
        description: "Alta performance com RTX 4080 e tela de 165Hz.",
        stock: 5,
    },
    Seed {
        id: "2",
        name: "iPhone 15 Pro Max 1TB Titanium",
        category: Category::Smartphones,
        price: 9_999,
        old_price: Some(11_499),
        rating: 4.0,
        reviews: 42,
        image: "https://images.unsplash.com/photo-1592899677977-9c10ca588bbd?auto=format&fit=crop&w=1128&q=80",
        badge: Some(Badge::Sale),
        description: "O mais poderoso iPhone com acabamento em titânio aeroespacial.",
        stock: 10,
    },
    Seed {
        id: "3",
        name: "PlayStation 5 Edition + 2 Controles",
        category: Category::Gaming,
        price: 4_299,
        old_price: None,
        rating: 5.0,
        reviews: 67,
        image: "https://images.unsplash.com/photo-1606144042614-b2417e99c4e3?auto=format&fit=crop&w=1170&q=80",
        badge: Some(Badge::New),
        description: "Jogue os maiores sucessos com gráficos incríveis e carregamento ultra-rápido.",
        stock: 0,
    },
    Seed {
        id: "4",
        name: "Fone Sony WH-1000XM5 Noise Cancelling",
        category: Category::Audio,
        price: 2_199,
        old_price: Some(2_749),
        rating: 4.8,
        reviews: 38,
        image: "https://images.unsplash.com/photo-1585298728729-e9f3c85e86b3?auto=format&fit=crop&w=1074&q=80",
        badge: Some(Badge::Sale),
        description: "Cancelamento de ruído líder da indústria e qualidade de áudio excepcional.",
        stock: 15,
    },
    Seed {
        id: "5",
        name: "MacBook Pro M3 Max 14\"",
        category: Category::Notebooks,
        price: 22_999,
        old_price: None,
        rating: 4.9,
        reviews: 15,
        image: "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?auto=format&fit=crop&w=1026&q=80",
        badge: None,
        description: "Desempenho monstruoso para profissionais criativos.",
        stock: 3,
    },
    Seed {
        id: "6",
        name: "Monitor Alienware 34\" Curvo QD-OLED",
        category: Category::TvMonitors,
        price: 7_499,
        old_price: Some(8_999),
        rating: 4.7,
        reviews: 12,
        image: "https://images.unsplash.com/photo-1527443224154-c4a3942d3acf?auto=format&fit=crop&w=1170&q=80",
        badge: Some(Badge::Sale),
        description: "Imersão absoluta com cores infinitas e tempo de resposta zero.",
        stock: 8,
    },
];

impl Seed {
    fn to_product(&self) -> Product {
        Product {
            id: ProductId::new(self.id),
            handle: Some(self.id.to_string()),
            name: self.name.to_string(),
            category: self.category,
            price: Price::from_units(self.price),
            old_price: self.old_price.map(Price::from_units),
            rating: self.rating,
            reviews: self.reviews,
            image: self.image.to_string(),
            badge: self.badge,
            description: self.description.to_string(),
            stock: self.stock,
        }
    }
}

/// The embedded fallback products, in display order.
#[must_use]
pub fn fallback_products() -> Vec<Product> {
    SEEDS.iter().map(Seed::to_product).collect()
}

/// Look up a single embedded product.
#[must_use]
pub fn fallback_product(id: &ProductId) -> Option<Product> {
    SEEDS
        .iter()
        .find(|seed| seed.id == id.as_str())
        .map(Seed::to_product)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use techsphere_core::StockStatus;

    use super::*;

    #[test]
    fn test_fallback_has_six_unique_products() {
        let products = fallback_products();
        assert_eq!(products.len(), 6);

        let ids: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 6);
        for id in ["1", "2", "3", "4", "5", "6"] {
            assert!(ids.contains(id));
        }
    }

    #[test]
    fn test_fallback_stock_levels() {
        let ps5 = fallback_product(&ProductId::new("3")).expect("product 3");
        assert_eq!(ps5.stock_status(), StockStatus::OutOfStock);

        let macbook = fallback_product(&ProductId::new("5")).expect("product 5");
        assert_eq!(macbook.stock_status(), StockStatus::LowStock);
        assert!(!macbook.is_on_sale());

        let monitor = fallback_product(&ProductId::new("6")).expect("product 6");
        assert!(monitor.is_on_sale());
    }

    #[test]
    fn test_fallback_unknown_id() {
        assert!(fallback_product(&ProductId::new("42")).is_none());
    }
}
