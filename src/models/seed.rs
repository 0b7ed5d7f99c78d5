//! Bundled default dataset, used when neither the remote nor local storage has data.

use super::{
    Accessibility, Dataset, Event, EventCategory, HelpCategory, HelpOffer, Region, Status,
};

/// The seed dataset shipped with the application.
pub fn seed_dataset() -> Dataset {
    Dataset::new(seed_events(), seed_help())
}

pub fn seed_events() -> Vec<Event> {
    vec![
        seed_event(
            "e1",
            "Баскетбол на колясках: Открытая тренировка",
            ("2023-10-25", "18:00"),
            "СК \"Игровой\", Ленинградский пр-т",
            Region::North,
            Accessibility::Full,
            EventCategory::Active,
            "Тренировка для новичков и любителей. Инвентарь предоставляется.",
            Some("https://example.com/reg1"),
        ),
        seed_event(
            "e2",
            "Экскурсия \"Москва Купеческая\" с тифлокомментариями",
            ("2023-10-26", "12:00"),
            "Музей Москвы",
            Region::Central,
            Accessibility::Full,
            EventCategory::Culture,
            "Специализированная экскурсия для незрячих и слабовидящих посетителей.",
            Some("https://example.com/reg2"),
        ),
        seed_event(
            "e3",
            "Курс \"Основы Python\" для людей с ОВЗ",
            ("2023-10-28", "19:00"),
            "Zoom",
            Region::Online,
            Accessibility::Full,
            EventCategory::Education,
            "Бесплатный вводный урок от школы \"Шанс\".",
            Some("https://example.com/reg3"),
        ),
        seed_event(
            "e4",
            "Группа поддержки родственников",
            ("2023-10-27", "18:30"),
            "Центр \"Благосфера\"",
            Region::North,
            Accessibility::Partial,
            EventCategory::Social,
            "Встреча для общения и обмена опытом ухода за маломобильными людьми.",
            None,
        ),
        seed_event(
            "e5",
            "Инклюзивный театр: Спектакль \"Прикосновение\"",
            ("2023-10-29", "17:00"),
            "Театр Наций",
            Region::Central,
            Accessibility::Full,
            EventCategory::Culture,
            "Спектакль с участием актеров с особенностями развития.",
            Some("https://example.com/reg5"),
        ),
    ]
}

pub fn seed_help() -> Vec<HelpOffer> {
    vec![
        seed_offer(
            "h1",
            "Социальное такси",
            HelpCategory::Accompaniment,
            "Перевозка маломобильных граждан к социально значимым объектам.",
            Region::AllRegions,
            "+7 (495) 123-45-67",
            false,
            "По тарифам МГТ, нужна регистрация в реестре.",
        ),
        seed_offer(
            "h2",
            "Фонд \"Право на чудо\"",
            HelpCategory::Legal,
            "Юридические консультации по оформлению инвалидности и ИПР.",
            Region::Online,
            "help@pravonachudo.ru",
            true,
            "Бесплатно для семей с детьми-инвалидами.",
        ),
        seed_offer(
            "h3",
            "Волонтеры \"Вместе\"",
            HelpCategory::HomeAndTech,
            "Помощь в покупке продуктов и уборке квартиры.",
            Region::South,
            "+7 (900) 555-55-55",
            true,
            "Заявка за 2 дня.",
        ),
        seed_offer(
            "h4",
            "Психологическая служба МЧС",
            HelpCategory::Psychology,
            "Круглосуточный телефон доверия.",
            Region::Online,
            "+7 (495) 989-50-50",
            true,
            "Анонимно.",
        ),
        seed_offer(
            "h5",
            "Мастерская \"Движение\"",
            HelpCategory::HomeAndTech,
            "Ремонт инвалидных колясок и средств реабилитации.",
            Region::NorthEast,
            "+7 (999) 111-22-33",
            false,
            "Оплата только запчастей, работа бесплатно.",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed_event(
    id: &str,
    title: &str,
    (date, time): (&str, &str),
    location: &str,
    district: Region,
    accessibility: Accessibility,
    category: EventCategory,
    description: &str,
    registration_link: Option<&str>,
) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        location: location.to_string(),
        district,
        accessibility,
        category,
        description: description.to_string(),
        registration_link: registration_link.map(str::to_string),
        contact_name: None,
        contact_phone: None,
        contact_methods: Vec::new(),
        status: Status::Approved,
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_offer(
    id: &str,
    org_name: &str,
    help_type: HelpCategory,
    description: &str,
    district: Region,
    contacts: &str,
    is_free: bool,
    conditions: &str,
) -> HelpOffer {
    HelpOffer {
        id: id.to_string(),
        org_name: org_name.to_string(),
        help_type,
        description: description.to_string(),
        district,
        contacts: contacts.to_string(),
        is_free,
        conditions: conditions.to_string(),
        status: Status::Approved,
    }
}
