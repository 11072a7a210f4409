//! Region and crop names the forecasting backend knows about.

pub const PHILIPPINE_REGIONS: &[&str] = &[
    "National Capital Region (NCR)",
    "Cordillera Administrative Region (CAR)",
    "Ilocos Region (Region I)",
    "Cagayan Valley (Region II)",
    "Central Luzon (Region III)",
    "Calabarzon (Region IV-A)",
    "Mimaropa (Region IV-B)",
    "Bicol Region (Region V)",
    "Western Visayas (Region VI)",
    "Central Visayas (Region VII)",
    "Eastern Visayas (Region VIII)",
    "Zamboanga Peninsula (Region IX)",
    "Northern Mindanao (Region X)",
    "Davao Region (Region XI)",
    "Soccsksargen (Region XII)",
    "Caraga (Region XIII)",
    "BARMM",
];

pub const AVAILABLE_CROPS: &[&str] = &[
    "Rice",
    "Corn",
    "Coconut",
    "Sugarcane",
    "Banana",
    "Mango",
    "Pineapple",
    "Coffee",
    "Cacao",
    "Abaca",
    "Tobacco",
    "Sweet Potato",
    "Cassava",
    "Onion",
    "Garlic",
    "Tomato",
    "Eggplant",
    "Cabbage",
    "Lettuce",
    "Carrots",
];
