use super::*;
use crate::config::PriceBuckets;
use crate::storage::DataSource;
use crate::types::{Category, Customer, Order, Product, Supplier};
use chrono::NaiveDate;
use itertools::Itertools;

fn order(id: i64, date: &str, total: f64) -> Order {
    Order {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        total,
    }
}

fn customer(id: &str, city: &str, country: &str, orders: Vec<Order>) -> Customer {
    Customer {
        id: id.to_string(),
        company_name: format!("{id} Ltd."),
        address: String::new(),
        city: city.to_string(),
        region: None,
        postal_code: None,
        country: country.to_string(),
        phone: "(000) 000-0000".to_string(),
        orders,
    }
}

fn supplier(name: &str, city: &str, country: &str) -> Supplier {
    Supplier {
        name: name.to_string(),
        address: String::new(),
        city: city.to_string(),
        country: country.to_string(),
    }
}

fn product(id: u32, category: Category, unit_price: f64, units_in_stock: u32) -> Product {
    Product {
        id,
        name: format!("product {id}"),
        category,
        unit_price,
        units_in_stock,
    }
}

fn ids<'a>(customers: impl IntoIterator<Item = &'a Customer>) -> Vec<&'a str> {
    customers.into_iter().map(|c| c.id.as_str()).collect()
}

// ================================ Restriction ================================

#[test]
fn test_turnover_above_example() {
    let customers = vec![
        customer("A", "X", "Y", vec![order(1, "1997-01-01", 5000.0)]),
        customer("B", "X", "Y", vec![order(1, "1997-01-01", 15000.0)]),
    ];
    assert_eq!(ids(turnover_above(&customers, 10000.0)), vec!["B"]);
}

#[test]
fn test_turnover_above_is_strict_and_handles_empty_orders() {
    let customers = vec![
        customer("A", "X", "Y", vec![order(1, "1997-01-01", 10000.0)]),
        customer("B", "X", "Y", vec![]),
    ];
    assert!(turnover_above(&customers, 10000.0).is_empty());
    assert_eq!(ids(turnover_above(&customers, 0.0)), vec!["A"]);
    // An empty order list sums to zero, which only a negative threshold admits.
    assert_eq!(ids(turnover_above(&customers, -1.0)), vec!["A", "B"]);
}

#[test]
fn test_turnover_above_is_monotonic() {
    let source = DataSource::sample().unwrap();
    let mut previous = usize::MAX;
    for threshold in [-1.0, 0.0, 1000.0, 5000.0, 10000.0, 50000.0, 100000.0, 1e9] {
        let result = turnover_above(&source.customers, threshold);
        assert!(result.len() <= previous);
        assert!(result.iter().all(|c| c.turnover() > threshold));
        let excluded = source.customers.len() - result.len();
        assert_eq!(
            excluded,
            source
                .customers
                .iter()
                .filter(|c| c.turnover() <= threshold)
                .count()
        );
        previous = result.len();
    }
}

#[test]
fn test_first_order_above_picks_first_match() {
    let customers = vec![
        customer(
            "A",
            "X",
            "Y",
            vec![
                order(1, "1997-01-01", 100.0),
                order(2, "1997-02-01", 600.0),
                order(3, "1997-03-01", 900.0),
            ],
        ),
        customer("B", "X", "Y", vec![order(4, "1997-01-01", 100.0)]),
    ];
    let result = first_order_above(&customers, 500.0);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].0.id, "A");
    assert_eq!(result[0].1.id, 2);
}

#[test]
fn test_validity_rules() {
    let mut valid = customer("OK", "X", "Y", vec![]);
    valid.postal_code = Some("12209".into());
    valid.region = Some("WA".into());

    let mut postal = customer("POSTAL", "X", "Y", vec![]);
    postal.postal_code = Some("WA1 1DP".into());

    let mut region = customer("REGION", "X", "Y", vec![]);
    region.region = Some("  ".into());

    let mut phone = customer("PHONE", "X", "Y", vec![]);
    phone.phone = "030-0074321".into();

    // Absent fields are tolerated.
    let absent = customer("ABSENT", "X", "Y", vec![]);

    assert!(violations(&valid).is_empty());
    assert!(violations(&absent).is_empty());
    assert_eq!(violations(&postal), vec![Violation::PostalCode]);
    assert_eq!(violations(&region), vec![Violation::Region]);
    assert_eq!(violations(&phone), vec![Violation::Phone]);

    let customers = vec![valid, postal, region, phone, absent];
    assert_eq!(
        ids(invalid_customers(&customers)),
        vec!["POSTAL", "REGION", "PHONE"]
    );
}

// =================================== Joins ===================================

fn join_fixture() -> (Vec<Customer>, Vec<Supplier>) {
    let customers = vec![
        customer("AROUT", "London", "UK", vec![]),
        customer("ALFKI", "Berlin", "Germany", vec![]),
        customer("FISSA", "Madrid", "Spain", vec![]),
        customer("EASTC", "London", "UK", vec![]),
    ];
    let suppliers = vec![
        supplier("Exotic Liquids", "London", "UK"),
        supplier("Heli", "Berlin", "Germany"),
        supplier("Forest Fine Foods", "London", "Canada"),
    ];
    (customers, suppliers)
}

#[test]
fn test_join_by_city() {
    let (customers, suppliers) = join_fixture();
    let rows = join_by_city(&customers, &suppliers);
    let pairs = rows
        .iter()
        .map(|row| (row.customer_id, row.supplier_name))
        .collect_vec();
    assert_eq!(
        pairs,
        vec![
            ("AROUT", "Exotic Liquids"),
            ("AROUT", "Forest Fine Foods"),
            ("ALFKI", "Heli"),
            ("EASTC", "Exotic Liquids"),
            ("EASTC", "Forest Fine Foods"),
        ]
    );
    assert!(rows.iter().all(|row| row.customer_city == row.supplier_city));
}

#[test]
fn test_join_row_counts() {
    let source = DataSource::sample().unwrap();
    let (customers, suppliers) = (&source.customers, &source.suppliers);

    let expected = customers
        .iter()
        .cartesian_product(suppliers.iter())
        .filter(|(c, s)| c.city == s.city)
        .count();
    let by_city = join_by_city(customers, suppliers);
    assert_eq!(by_city.len(), expected);

    let by_city_and_country = join_by_city_and_country(customers, suppliers);
    assert!(by_city_and_country.len() <= by_city.len());
    assert!(by_city_and_country
        .iter()
        .all(|row| row.customer_country == row.supplier_country));
}

#[test]
fn test_join_by_city_and_country_narrows() {
    let (customers, suppliers) = join_fixture();
    let rows = join_by_city_and_country(&customers, &suppliers);
    let pairs = rows
        .iter()
        .map(|row| (row.customer_id, row.supplier_name))
        .collect_vec();
    assert_eq!(
        pairs,
        vec![
            ("AROUT", "Exotic Liquids"),
            ("ALFKI", "Heli"),
            ("EASTC", "Exotic Liquids"),
        ]
    );
}

#[test]
fn test_group_join_by_city() {
    let (customers, suppliers) = join_fixture();
    let rows = group_join_by_city(&customers, &suppliers);
    assert_eq!(rows.len(), customers.len());
    for (row, customer) in rows.iter().zip(&customers) {
        assert_eq!(row.customer_id, customer.id);
        let sharing = suppliers.iter().filter(|s| s.city == customer.city).count();
        assert_eq!(row.suppliers.len(), sharing);
    }
    assert!(rows[2].suppliers.is_empty());
}

// ================================= Ordering ==================================

#[test]
fn test_first_order_ties_break_by_sequence() {
    let c = customer(
        "A",
        "X",
        "Y",
        vec![
            order(3, "1997-05-01", 1.0),
            order(1, "1997-02-01", 2.0),
            order(2, "1997-02-01", 3.0),
        ],
    );
    assert_eq!(first_order(&c).map(|o| o.id), Some(1));
    assert_eq!(first_order(&customer("B", "X", "Y", vec![])), None);
}

#[test]
fn test_order_by_first_order() {
    let customers = vec![
        customer("D", "X", "Y", vec![order(1, "1997-03-10", 10.0)]),
        customer("C", "X", "Y", vec![order(1, "1996-12-01", 10.0)]),
        customer("NONE", "X", "Y", vec![]),
        customer(
            "B",
            "X",
            "Y",
            vec![order(1, "1997-03-20", 10.0), order(2, "1998-01-01", 50.0)],
        ),
        customer("A", "X", "Y", vec![order(1, "1997-03-01", 10.0)]),
    ];
    let ordered = order_by_first_order(&customers).unwrap();
    // 1996-12 first; the three 1997-03 customers by turnover desc, then id.
    assert_eq!(ids(ordered), vec!["NONE", "C", "B", "A", "D"]);
}

#[test]
fn test_order_by_first_order_is_stable() {
    let twin = |id: &str| customer(id, "X", "Y", vec![order(1, "1997-03-10", 10.0)]);
    // Identical key tuples only arise for equal ids, so use duplicates.
    let customers = vec![twin("A"), twin("B"), twin("A")];
    let ordered = order_by_first_order(&customers).unwrap();
    assert!(std::ptr::eq(ordered[0], &customers[0]));
    assert!(std::ptr::eq(ordered[1], &customers[2]));
    assert!(std::ptr::eq(ordered[2], &customers[1]));
}

// ================================= Grouping ==================================

#[test]
fn test_group_by_category_and_stock() {
    let products = vec![
        product(1, Category::Seafood, 10.0, 5),
        product(2, Category::Beverages, 30.0, 7),
        product(3, Category::Beverages, 20.0, 7),
        product(4, Category::Beverages, 5.0, 0),
        product(5, Category::Seafood, 1.0, 2),
    ];
    let groups = group_by_category_and_stock(&products);

    let shape = groups
        .iter()
        .map(|group| {
            (
                group.category,
                group
                    .stock_levels
                    .iter()
                    .map(|level| {
                        (
                            level.units_in_stock,
                            level.products.iter().map(|p| p.id).collect_vec(),
                        )
                    })
                    .collect_vec(),
            )
        })
        .collect_vec();
    assert_eq!(
        shape,
        vec![
            (Category::Beverages, vec![(0, vec![4]), (7, vec![3, 2])]),
            (Category::Seafood, vec![(2, vec![5]), (5, vec![1])]),
        ]
    );
}

#[test]
fn test_classify_by_price_example() {
    let products = vec![
        product(1, Category::Beverages, 9.99, 1),
        product(2, Category::Beverages, 19.99, 1),
        product(3, Category::Beverages, 25.0, 1),
    ];
    let buckets = classify_by_price(&products, &PriceBuckets::default());
    let counts = buckets
        .iter()
        .map(|(bucket, products)| (*bucket, products.len()))
        .collect_vec();
    assert_eq!(
        counts,
        vec![
            (PriceBucket::Cheap, 1),
            (PriceBucket::Normal, 1),
            (PriceBucket::Costy, 1)
        ]
    );
}

#[test]
fn test_classify_by_price_boundaries_and_totality() {
    let bounds = PriceBuckets::default();
    assert_eq!(PriceBucket::classify(10.0, &bounds), PriceBucket::Normal);
    assert_eq!(PriceBucket::classify(20.0, &bounds), PriceBucket::Costy);
    assert_eq!(PriceBucket::classify(0.0, &bounds), PriceBucket::Cheap);

    let source = DataSource::sample().unwrap();
    let buckets = classify_by_price(&source.products, &bounds);
    assert_eq!(buckets.len(), 3);
    let placed = buckets.values().map(Vec::len).sum::<usize>();
    assert_eq!(placed, source.products.len());

    let empty = classify_by_price(&[], &bounds);
    assert!(empty.values().all(Vec::is_empty));
    assert_eq!(empty.len(), 3);
}

// ================================ Aggregates =================================

#[test]
fn test_city_statistics() {
    let customers = vec![
        customer(
            "A",
            "London",
            "UK",
            vec![order(1, "1997-01-01", 100.0), order(2, "1997-02-01", 300.0)],
        ),
        customer("B", "London", "UK", vec![order(1, "1997-01-01", 200.0)]),
        customer("C", "Madrid", "Spain", vec![]),
    ];
    let statistics = city_statistics(&customers).unwrap();
    assert_eq!(statistics.keys().collect_vec(), vec!["London", "Madrid"]);

    let london = &statistics["London"];
    assert_eq!(london.customers, 2);
    assert_eq!(london.orders, 3);
    assert_eq!(london.average_total, Some(200.0));
    assert_eq!(london.intensity, 1.5);

    let madrid = &statistics["Madrid"];
    assert_eq!(madrid.orders, 0);
    assert_eq!(madrid.average_total, None);
    assert_eq!(madrid.intensity, 0.0);
}

#[test]
fn test_city_entry_rejects_unexpected_aggregates() {
    use super::engine::city_entry;
    use crate::common::Error;
    use crate::types::Field;

    let entry = city_entry("London", 2, Field::Float(200.0), Field::Integer(3)).unwrap();
    assert_eq!(entry.orders, 3);
    assert_eq!(entry.intensity, 1.5);
    assert_eq!(entry.average_total, Some(200.0));

    assert!(matches!(
        city_entry("London", 2, Field::Float(200.0), Field::from("three")),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        city_entry("London", 2, Field::Float(200.0), Field::Integer(-1)),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        city_entry("London", 2, Field::from("avg"), Field::Integer(3)),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        city_entry("Nowhere", 0, Field::Null, Field::Integer(0)),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_city_statistics_has_one_entry_per_city() {
    let source = DataSource::sample().unwrap();
    let statistics = city_statistics(&source.customers).unwrap();
    let cities = source.customers.iter().map(|c| c.city.as_str()).unique().count();
    assert_eq!(statistics.len(), cities);
}

#[test]
fn test_order_activity() {
    let customers = vec![
        customer(
            "A",
            "X",
            "Y",
            vec![order(1, "1997-01-05", 1.0), order(2, "1998-01-05", 1.0)],
        ),
        customer(
            "B",
            "X",
            "Y",
            vec![order(1, "1997-03-05", 1.0), order(2, "1997-01-30", 1.0)],
        ),
    ];
    assert_eq!(
        orders_by_month(&customers).into_iter().collect_vec(),
        vec![(1, 3), (3, 1)]
    );
    assert_eq!(
        orders_by_year(&customers).into_iter().collect_vec(),
        vec![(1997, 3), (1998, 1)]
    );
    let nested = orders_by_year_and_month(&customers);
    assert_eq!(nested[&1997].iter().collect_vec(), vec![(&1, &2), (&3, &1)]);
    assert_eq!(nested[&1998].iter().collect_vec(), vec![(&1, &1)]);
}

#[test]
fn test_year_month_sums_match_year_counts() {
    let source = DataSource::sample().unwrap();
    let by_year = orders_by_year(&source.customers);
    let nested = orders_by_year_and_month(&source.customers);
    assert_eq!(by_year.keys().collect_vec(), nested.keys().collect_vec());
    for (year, months) in &nested {
        assert_eq!(months.values().sum::<usize>(), by_year[year]);
        assert!(months.keys().tuple_windows().all(|(a, b)| a < b));
    }
}
