//! Default category seed set.
//!
//! Inserted as one batch the first time an empty store is read. The triples
//! are identical across all three backends; ids are the slugs of the names.

/// Fallback color when a category is created without one (gray-500).
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

/// A seed entry: `(id, name, color)`.
#[derive(Debug, Clone, Copy)]
pub struct SeedCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

/// The fixed default categories, seeded once into an empty store.
pub const DEFAULT_CATEGORIES: [SeedCategory; 15] = [
    SeedCategory {
        id: "arabic-proverbs",
        name: "Arabic Proverbs",
        color: "#10b981",
    },
    SeedCategory {
        id: "artworks-done-especially-for-my-kids",
        name: "Artworks Done Especially For My Kids",
        color: "#ef4444",
    },
    SeedCategory {
        id: "combination-design-and-colour",
        name: "Combination Design and Colour",
        color: "#8b5cf6",
    },
    SeedCategory {
        id: "english-proverbs",
        name: "English Proverbs",
        color: "#3b82f6",
    },
    SeedCategory {
        id: "khaldoon-unique-freehand-writing",
        name: "Khaldoon Unique Freehand Writing",
        color: "#f97316",
    },
    SeedCategory {
        id: "modern-painting",
        name: "Modern Painting",
        color: "#06b6d4",
    },
    SeedCategory {
        id: "personal-names",
        name: "Personal Names",
        color: "#ec4899",
    },
    SeedCategory {
        id: "sign-label",
        name: "Sign Label",
        color: "#eab308",
    },
    SeedCategory {
        id: "still-life",
        name: "Still Life",
        color: "#84cc16",
    },
    SeedCategory {
        id: "t-shirt",
        name: "T Shirt",
        color: "#a855f7",
    },
    SeedCategory {
        id: "ultra-modern-aya",
        name: "Ultra Modern Aya",
        color: "#6366f1",
    },
    SeedCategory {
        id: "ultra-modern-duaa",
        name: "Ultra Modern Duaa",
        color: "#14b8a6",
    },
    SeedCategory {
        id: "ultra-modern-hadith",
        name: "Ultra Modern Hadith",
        color: "#22c55e",
    },
    SeedCategory {
        id: "ultra-modern-style",
        name: "Ultra Modern Style",
        color: "#f59e0b",
    },
    SeedCategory {
        id: "with-oriental-taste",
        name: "With Oriental Taste",
        color: "#f43f5e",
    },
];
