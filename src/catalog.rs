//! Static content registries: the concept catalog and the exercise index.
//!
//! Both are built once at startup from the optional TOML banks plus the
//! built-in seeds, and are read-only afterwards. Seed data guarantees the
//! app is useful even without an external config file.
//!
//! Catalog iteration order is stable insertion order (config entries first,
//! then seeds); the review scheduler relies on it to break importance ties
//! deterministically.

use std::collections::HashMap;

use crate::config::CoachConfig;
use crate::domain::{Concept, ConceptCategory, Exercise, ExerciseCategory, QuickReview};

/// Read-only registry of concepts, keyed by id, iterable in insertion order.
#[derive(Debug, Default)]
pub struct ConceptCatalog {
    concepts: Vec<Concept>,
    index: HashMap<String, usize>,
}

impl ConceptCatalog {
    /// Build from config-bank entries (if any) followed by built-in seeds.
    /// Seeds never overwrite an id already defined by the config.
    pub fn build(cfg: Option<&CoachConfig>) -> Self {
        let mut catalog = Self::default();

        if let Some(cfg) = cfg {
            for cc in &cfg.concepts {
                if cc.introduced_on_day == 0 {
                    tracing::error!(target: "progression", id = %cc.id, "Skipping bank concept: introduced_on_day must be >= 1.");
                    continue;
                }
                catalog.insert(Concept {
                    id: cc.id.clone(),
                    name: cc.name.clone(),
                    category: cc.category,
                    introduced_on_day: cc.introduced_on_day,
                    short_description: cc.short_description.clone(),
                    key_points: cc.key_points.clone(),
                    quick_review: cc.quick_review.clone(),
                });
            }
        }

        for c in seed_concepts() {
            catalog.insert(c);
        }
        catalog
    }

    /// Build a catalog from explicit concepts. First entry wins on duplicate
    /// ids, like the config-then-seeds policy of `build`.
    pub fn from_concepts(concepts: impl IntoIterator<Item = Concept>) -> Self {
        let mut catalog = Self::default();
        for c in concepts {
            catalog.insert(c);
        }
        catalog
    }

    fn insert(&mut self, c: Concept) {
        if self.index.contains_key(&c.id) {
            return;
        }
        self.index.insert(c.id.clone(), self.concepts.len());
        self.concepts.push(c);
    }

    pub fn get(&self, id: &str) -> Option<&Concept> {
        self.index.get(id).map(|&i| &self.concepts[i])
    }

    /// All concepts, in stable catalog order.
    pub fn all(&self) -> &[Concept] {
        &self.concepts
    }

    /// Concepts first introduced on exactly this day.
    pub fn introduced_on(&self, day: u32) -> Vec<&Concept> {
        self.concepts
            .iter()
            .filter(|c| c.introduced_on_day == day)
            .collect()
    }

    pub fn by_category(&self, category: ConceptCategory) -> Vec<&Concept> {
        self.concepts
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }
}

/// Read-only index of exercise summaries, globally sorted by
/// (category, day, order) like the original JSON loader.
#[derive(Debug, Default)]
pub struct ExerciseIndex {
    exercises: Vec<Exercise>,
}

impl ExerciseIndex {
    pub fn build(cfg: Option<&CoachConfig>) -> Self {
        let mut exercises = Vec::new();
        let mut seen = std::collections::HashSet::new();

        if let Some(cfg) = cfg {
            for ec in &cfg.exercises {
                if ec.day == 0 {
                    tracing::error!(target: "progression", id = %ec.id, "Skipping bank exercise: day must be >= 1.");
                    continue;
                }
                let difficulty = ec.difficulty.unwrap_or(1).clamp(1, 5);
                let points = ec
                    .points
                    .unwrap_or_else(|| cfg.program.xp.points_for_difficulty(difficulty));
                if seen.insert(ec.id.clone()) {
                    exercises.push(Exercise {
                        id: ec.id.clone(),
                        category: ec.category,
                        day: ec.day,
                        order: ec.order,
                        title: ec.title.clone(),
                        difficulty,
                        points,
                        estimated_time: ec.estimated_time.unwrap_or(15),
                    });
                }
            }
        }

        for e in seed_exercises() {
            if seen.insert(e.id.clone()) {
                exercises.push(e);
            }
        }

        exercises.sort_by(|a, b| {
            (a.category, a.day, a.order).cmp(&(b.category, b.day, b.order))
        });
        Self { exercises }
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn all(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Exercises of one day, in global (category, day, order) order, so C
    /// exercises come first and positions within the list are the unlock
    /// indices.
    pub fn by_day(&self, day: u32) -> Vec<&Exercise> {
        self.exercises.iter().filter(|e| e.day == day).collect()
    }

    /// The featured exercise of a day: the first C exercise, else the first
    /// of any category.
    pub fn daily_exercise(&self, day: u32) -> Option<&Exercise> {
        let list = self.by_day(day);
        list.iter()
            .find(|e| e.category == ExerciseCategory::C)
            .copied()
            .or_else(|| list.first().copied())
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }
}

fn concept(
    id: &str,
    name: &str,
    category: ConceptCategory,
    day: u32,
    short_description: &str,
    key_points: &[&str],
    quick_review: Option<(&str, &str, &str)>,
) -> Concept {
    Concept {
        id: id.into(),
        name: name.into(),
        category,
        introduced_on_day: day,
        short_description: short_description.into(),
        key_points: key_points.iter().map(|s| s.to_string()).collect(),
        quick_review: quick_review.map(|(question, hint, answer)| QuickReview {
            question: question.into(),
            hint: hint.into(),
            answer: answer.into(),
        }),
    }
}

/// Built-in concept catalog for the first days of the program.
pub fn seed_concepts() -> Vec<Concept> {
    use ConceptCategory::*;
    vec![
        // Jour 1
        concept(
            "printf",
            "printf()",
            C,
            1,
            "Afficher du texte à l'écran",
            &[
                "printf(\"texte\") pour afficher",
                "\\n pour retour à la ligne",
                "Nécessite #include <stdio.h>",
            ],
            Some((
                "Comment afficher \"Bonjour\" suivi d'un retour à la ligne ?",
                "Utilise printf avec \\n",
                "printf(\"Bonjour\\n\");",
            )),
        ),
        concept(
            "main-function",
            "Fonction main()",
            C,
            1,
            "Point d'entrée du programme",
            &[
                "int main(void) { }",
                "return (0) pour succès",
                "C'est le point de départ du programme",
            ],
            Some((
                "Quelle est la signature de la fonction main ?",
                "Type de retour, nom, paramètres",
                "int main(void)",
            )),
        ),
        concept(
            "include-stdio",
            "#include <stdio.h>",
            C,
            1,
            "Bibliothèque standard input/output",
            &[
                "Nécessaire pour printf, scanf, etc.",
                "Se place en haut du fichier",
                "stdio = Standard Input Output",
            ],
            Some((
                "Pourquoi a-t-on besoin de #include <stdio.h> ?",
                "Pense aux fonctions d'affichage",
                "Pour utiliser printf() et les fonctions d'entrée/sortie",
            )),
        ),
        concept(
            "gcc-compilation",
            "Compilation avec gcc",
            C,
            1,
            "Compiler un programme C",
            &[
                "gcc fichier.c compile le code",
                "-o nom pour nommer l'exécutable",
                "-Wall -Wextra -Werror pour les warnings",
            ],
            Some((
                "Quelle commande pour compiler main.c avec tous les warnings ?",
                "gcc + flags Wall Wextra Werror",
                "gcc -Wall -Wextra -Werror main.c",
            )),
        ),
        concept(
            "terminal-ls",
            "Commande ls",
            Terminal,
            1,
            "Lister les fichiers",
            &[
                "ls affiche les fichiers du dossier courant",
                "ls -l pour format long",
                "ls -a pour afficher les fichiers cachés",
            ],
            Some((
                "Quelle commande pour voir TOUS les fichiers y compris cachés ?",
                "ls avec l'option -a",
                "ls -a",
            )),
        ),
        concept(
            "terminal-cd",
            "Commande cd",
            Terminal,
            1,
            "Changer de dossier",
            &[
                "cd dossier pour entrer",
                "cd .. pour remonter",
                "cd ~ pour aller au home",
            ],
            Some(("Comment revenir au dossier parent ?", "cd avec ..", "cd ..")),
        ),
        concept(
            "git-init",
            "git init",
            Git,
            1,
            "Créer un dépôt Git",
            &[
                "git init initialise un repo",
                "Crée un dossier .git caché",
                "À faire une seule fois par projet",
            ],
            Some((
                "Quelle commande pour initialiser un repo Git ?",
                "git ...",
                "git init",
            )),
        ),
        concept(
            "git-add",
            "git add",
            Git,
            1,
            "Ajouter des fichiers au staging",
            &[
                "git add fichier ajoute un fichier",
                "git add . ajoute tout",
                "Nécessaire avant commit",
            ],
            Some((
                "Comment ajouter TOUS les fichiers au staging ?",
                "git add avec .",
                "git add .",
            )),
        ),
        // Jour 2
        concept(
            "variables",
            "Variables (int, char)",
            C,
            2,
            "Déclarer et utiliser des variables",
            &[
                "int age = 25; pour les entiers",
                "char lettre = 'A'; pour les caractères",
                "Initialiser avant d'utiliser",
            ],
            Some((
                "Déclare une variable entière \"compteur\" initialisée à 0",
                "Type int, nom, = valeur",
                "int compteur = 0;",
            )),
        ),
        concept(
            "if-else",
            "Conditions if/else",
            C,
            2,
            "Exécuter du code selon une condition",
            &[
                "if (condition) { code }",
                "else { code alternatif }",
                "Conditions: ==, !=, <, >, <=, >=",
            ],
            Some((
                "Écris une condition qui affiche \"Majeur\" si age >= 18",
                "if (age ...) printf(...)",
                "if (age >= 18) printf(\"Majeur\\n\");",
            )),
        ),
        concept(
            "while-loop",
            "Boucle while",
            C,
            2,
            "Répéter du code tant qu'une condition est vraie",
            &[
                "while (condition) { code }",
                "Ne pas oublier d'incrémenter !",
                "Risque de boucle infinie si condition toujours vraie",
            ],
            Some((
                "Affiche les nombres de 0 à 4 avec une boucle while",
                "Compteur de 0, condition < 5, printf + incrément",
                "int i = 0; while (i < 5) { printf(\"%d\\n\", i); i++; }",
            )),
        ),
        // Jour 3
        concept(
            "strings",
            "Chaînes de caractères",
            C,
            3,
            "Manipuler du texte en C",
            &[
                "char str[] = \"Hello\"; pour déclarer",
                "Toujours terminé par \\0 (null terminator)",
                "Tableau de caractères",
            ],
            Some((
                "Comment déclarer une chaîne \"Bonjour\" ?",
                "char tableau[], guillemets",
                "char str[] = \"Bonjour\";",
            )),
        ),
        concept(
            "arrays",
            "Tableaux",
            C,
            3,
            "Stocker plusieurs valeurs du même type",
            &[
                "int tab[5]; pour déclarer",
                "tab[0] pour le 1er élément",
                "Indices de 0 à taille-1",
            ],
            Some((
                "Déclare un tableau de 10 entiers nommé \"nombres\"",
                "int nom[taille]",
                "int nombres[10];",
            )),
        ),
        concept(
            "pointers-intro",
            "Pointeurs (introduction)",
            C,
            3,
            "Adresse mémoire d'une variable",
            &[
                "int *ptr; déclare un pointeur",
                "&variable pour obtenir l'adresse",
                "*ptr pour accéder à la valeur pointée",
            ],
            Some((
                "Comment obtenir l'adresse d'une variable \"age\" ?",
                "Opérateur &",
                "&age",
            )),
        ),
        concept(
            "debug-printf",
            "Debug avec printf",
            Debug,
            3,
            "Tracer l'exécution avec des affichages",
            &[
                "printf au début/fin des fonctions",
                "Afficher les valeurs intermédiaires",
                "Retirer les traces avant de rendre",
            ],
            None,
        ),
    ]
}

fn exercise(
    id: &str,
    title: &str,
    category: ExerciseCategory,
    day: u32,
    order: usize,
    difficulty: u8,
    points: u32,
    estimated_time: u32,
) -> Exercise {
    Exercise {
        id: id.into(),
        category,
        day,
        order,
        title: title.into(),
        difficulty,
        points,
        estimated_time,
    }
}

/// Built-in exercise summaries for the first days of the program.
pub fn seed_exercises() -> Vec<Exercise> {
    use ExerciseCategory::*;
    vec![
        exercise("c-day01-ex00-hello", "Hello, World!", C, 1, 0, 1, 5, 10),
        exercise("c-day01-ex01-variables", "Somme de deux variables", C, 1, 1, 1, 5, 15),
        exercise("c-day01-ex02-printf", "printf avancé", C, 1, 2, 2, 10, 15),
        exercise("c-day01-ex03-retour-ligne", "Retours à la ligne", C, 1, 3, 1, 5, 10),
        exercise("terminal-day01-ex00-navigation", "Navigation dans les dossiers", Terminal, 1, 0, 1, 5, 10),
        exercise("git-day01-ex00-init", "Premier dépôt Git", Git, 1, 0, 1, 5, 10),
        exercise("c-day02-ex00-conditions", "Majeur ou mineur", C, 2, 0, 2, 10, 20),
        exercise("c-day02-ex01-while", "Compter avec while", C, 2, 1, 2, 10, 20),
        exercise("c-day02-ex02-fizzbuzz", "FizzBuzz", C, 2, 2, 3, 10, 25),
        exercise("c-day03-ex00-ft-strlen", "ft_strlen", C, 3, 0, 3, 10, 25),
        exercise("c-day03-ex01-ft-strcpy", "ft_strcpy", C, 3, 1, 3, 10, 25),
        exercise("c-day03-ex02-tableaux", "Parcours de tableau", C, 3, 2, 2, 10, 20),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoachConfig, ConceptCfg};

    #[test]
    fn seed_catalog_lookups() {
        let catalog = ConceptCatalog::build(None);
        assert!(catalog.len() >= 10);

        let printf = catalog.get("printf").expect("printf seeded");
        assert_eq!(printf.introduced_on_day, 1);
        assert_eq!(printf.category, ConceptCategory::C);

        let day2 = catalog.introduced_on(2);
        assert!(day2.iter().all(|c| c.introduced_on_day == 2));
        assert!(day2.iter().any(|c| c.id == "while-loop"));

        let git = catalog.by_category(ConceptCategory::Git);
        assert!(git.iter().all(|c| c.category == ConceptCategory::Git));
        assert!(!git.is_empty());
    }

    #[test]
    fn config_concepts_take_precedence_over_seeds() {
        let cfg = CoachConfig {
            concepts: vec![ConceptCfg {
                id: "printf".into(),
                name: "printf (custom)".into(),
                category: ConceptCategory::C,
                introduced_on_day: 7,
                short_description: String::new(),
                key_points: vec![],
                quick_review: None,
            }],
            ..Default::default()
        };
        let catalog = ConceptCatalog::build(Some(&cfg));
        let printf = catalog.get("printf").unwrap();
        assert_eq!(printf.introduced_on_day, 7);
        assert_eq!(printf.name, "printf (custom)");
        // Config entries come first in catalog order.
        assert_eq!(catalog.all()[0].id, "printf");
    }

    #[test]
    fn invalid_bank_concept_is_skipped() {
        let cfg = CoachConfig {
            concepts: vec![ConceptCfg {
                id: "bogus".into(),
                name: "Bogus".into(),
                category: ConceptCategory::C,
                introduced_on_day: 0,
                short_description: String::new(),
                key_points: vec![],
                quick_review: None,
            }],
            ..Default::default()
        };
        let catalog = ConceptCatalog::build(Some(&cfg));
        assert!(catalog.get("bogus").is_none());
    }

    #[test]
    fn exercises_sorted_by_category_day_order() {
        let index = ExerciseIndex::build(None);
        let all = index.all();
        for pair in all.windows(2) {
            let a = (&pair[0].category, pair[0].day, pair[0].order);
            let b = (&pair[1].category, pair[1].day, pair[1].order);
            assert!(a <= b, "index must be sorted");
        }
    }

    #[test]
    fn day_listing_and_daily_exercise() {
        let index = ExerciseIndex::build(None);
        let day1 = index.by_day(1);
        assert_eq!(day1.len(), 6);
        // Categories stay grouped, and within a category orders ascend.
        assert!(day1
            .windows(2)
            .all(|w| w[0].category != w[1].category || w[0].order < w[1].order));
        assert_eq!(day1[0].id, "c-day01-ex00-hello");

        let daily = index.daily_exercise(1).expect("day 1 has exercises");
        assert_eq!(daily.category, ExerciseCategory::C);
        assert_eq!(daily.id, "c-day01-ex00-hello");
    }
}
