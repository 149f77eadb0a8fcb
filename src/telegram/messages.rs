//! Message texts shared by the three bots (HTML parse mode)

use indoc::{formatdoc, indoc};

use crate::core::types::{Executor, Order};
use crate::core::validation::{ValidationError, MAX_ANSWER_CHARS};
use crate::storage::ExecutorsByStatus;
use crate::telegram::html::{bold, code, escape};

pub const GREETING: &str = "Здравствуйте! Чем можем помочь?";
pub const MAIN_MENU: &str = "Главное меню:";
pub const ASK_CALLBACK_PHONE: &str = "Оставьте номер <b>в формате</b> <code>+375XXXXXXXXX</code> — мы перезвоним.";
pub const CALLBACK_PHONE_INVALID: &str =
    "Пожалуйста, укажите номер в формате <code>+375XXXXXXXXX</code> (ровно 9 цифр после +375).";
pub const CALLBACK_THANKS: &str = "Спасибо! Передали диспетчеру — скоро свяжемся.";
pub const ASK_ORDER_PHONE: &str = "Для связи укажите ваш номер <code>+375XXXXXXXXX</code>:";
pub const PHONE_FORMAT: &str = "Формат: <code>+375XXXXXXXXX</code> (ровно 9 цифр после +375).";
pub const ASK_CATEGORY: &str = "Выберите категорию:";
pub const ASK_DESCRIPTION: &str = "Коротко опишите, что нужно (объём, особенности):";
pub const ASK_ADDRESS: &str = "Адрес (улица, дом; ориентиры по желанию):";
pub const ASK_DATE: &str = "Когда нужно начать работы?";
pub const ASK_DATE_IN_WEEK: &str = "Выберите день в течение недели:";
pub const USE_BUTTONS: &str = "Пожалуйста, воспользуйтесь кнопками ниже.";
pub const EMPTY_ANSWER: &str = "Нужен текстовый ответ. Попробуйте ещё раз.";

pub const PRO_ASK_NAME: &str = "Регистрация исполнителя.\nВведите ваше имя / компанию:";
pub const PRO_ASK_PHONE: &str = "Укажите телефон в формате <code>+375XXXXXXXXX</code>:";
pub const PRO_ASK_CATEGORIES: &str = "Выберите ваши категории (можно несколько), затем нажмите <b>Готово</b>:";
pub const PRO_NO_CATEGORIES: &str = "Выберите хотя бы одну категорию";
pub const PRO_REGISTERED: &str = "Спасибо! Заявка на регистрацию отправлена диспетчеру. Ожидайте одобрения.";
pub const PRO_NOT_REGISTERED: &str = "Вы ещё не зарегистрированы. Нажмите Start по диплинку регистрации.";
pub const PRO_HELP: &str = "Здесь будут приходить подходящие вам заявки. Нажимайте 👍 если готовы взять задачу.";
pub const PRO_APPROVED: &str = "✅ Ваша регистрация одобрена. Теперь вам будут приходить подходящие заявки.";

pub const TAKE_ACCEPTED: &str = "Принято! Диспетчер с вами свяжется.";
pub const TAKE_BAD_REF: &str = "Ошибка";
pub const TAKE_UNKNOWN_ORDER: &str = "Заявка недоступна";
pub const TAKE_NOT_APPROVED: &str = "Доступ только для одобренных исполнителей";
pub const SKIPPED: &str = "Пропущено";

pub const NO_ACCESS: &str = "Нет доступа.";
pub const EXECUTOR_NOT_FOUND: &str = "Исполнитель не найден";
pub const ORDER_NOT_FOUND: &str = "Заявка не найдена";
pub const NO_ORDERS: &str = "Заявок пока нет.";

/// Re-prompt for a free-text answer that failed validation
pub fn answer_rejected(err: &ValidationError) -> String {
    match err {
        ValidationError::AnswerTooLong(_) => format!(
            "Слишком длинный ответ. Уложитесь в {} символов и попробуйте ещё раз.",
            MAX_ANSWER_CHARS
        ),
        _ => EMPTY_ANSWER.to_string(),
    }
}

/// The "About" card with the dispatcher's phone
pub fn about(support_phone: &str) -> String {
    formatdoc! {"
        Мы — диспетчерский центр строительных работ в Могилёве.

        • Помогаем быстро найти технику и бригады.
        • Подбираем исполнителей под вашу задачу.
        • Диспетчер связывается и сопровождает до старта работ.

        Телефон диспетчера: {phone}",
        phone = bold(support_phone),
    }
}

/// Admin notice for a callback request
pub fn callback_request(who: &str, phone: &str) -> String {
    format!("📞 <b>Обратный звонок</b>\nОт: {}\nТелефон: {}", who, bold(phone))
}

/// Confirmation shown to the customer once the order exists
pub fn order_created(order: &Order) -> String {
    formatdoc! {"
        ✅ Заявка <b>#{id}</b> создана.

        <b>Категория:</b> {category}
        <b>Описание:</b> {description}
        <b>Адрес:</b> {address}
        <b>Дата:</b> {date}

        Мы отправили заявку подходящим исполнителям. Диспетчер свяжется с вами.",
        id = order.id,
        category = escape(order.category.label()),
        description = escape(&order.description),
        address = escape(&order.address),
        date = order.date_label(),
    }
}

/// Card delivered to matching contractors through the pro bot
pub fn order_card(order: &Order) -> String {
    formatdoc! {"
        📥 <b>Заявка #{id}</b>
        Категория: {category}
        Дата: {date}
        Адрес: {address}
        Описание: {description}

        Готовы взяться?",
        id = order.id,
        category = bold(order.category.label()),
        date = bold(&order.date_label()),
        address = escape(&order.address),
        description = escape(&order.description),
    }
}

/// Admin notice: nobody serves the order's category
pub fn no_coverage(order: &Order) -> String {
    format!(
        "⚠️ Нет одобренных исполнителей по категории [{}] для заявки #{}.\nКлиент: {} — позвоните вручную.",
        escape(order.category.label()),
        order.id,
        bold(&order.customer_phone),
    )
}

/// Admin notice: there were targets but no card got through
pub fn nobody_reached(order: &Order) -> String {
    format!(
        "⚠️ Ни одному исполнителю не доставлено в личку (никто не нажал Start у ProBot) по заявке #{} [{}].",
        order.id,
        escape(order.category.label()),
    )
}

/// Admin notice for a new contractor registration, with ready-to-copy commands
pub fn new_registration(who: &str, executor: &Executor) -> String {
    formatdoc! {"
        🆕 <b>Новая регистрация исполнителя</b>
        {who}
        Имя: {name}
        Телефон: {phone}
        Категории: {categories}
        Одобрить: /exec_approve {id}
        Заблокировать: /exec_block {id}",
        who = who,
        name = escape(&executor.name),
        phone = bold(&executor.phone),
        categories = escape(&executor.categories_label()),
        id = executor.user_id,
    }
}

/// Admin notice for a contractor taking an order
pub fn order_response(order: &Order, executor: &Executor, who: &str) -> String {
    formatdoc! {"
        ✅ <b>Отклик</b> по заявке #{id} [{category}]
        Исполнитель: {who} ({name})
        Тел.: {executor_phone}
        Клиент: {customer_phone}
        Адрес: {address}
        Дата: {date}
        Описание: {description}",
        id = order.id,
        category = escape(order.category.label()),
        who = who,
        name = escape(&executor.name),
        executor_phone = bold(&executor.phone),
        customer_phone = bold(&order.customer_phone),
        address = escape(&order.address),
        date = order.date_label(),
        description = escape(&order.description),
    }
}

/// Pro bot greeting with the contractor's status
pub fn pro_status(executor: Option<&Executor>) -> String {
    let status = executor.map_or("не зарегистрирован", |e| e.status.label());
    format!("Привет! Статус: {}.\nМеню ниже.", bold(status))
}

pub fn pro_categories(executor: &Executor) -> String {
    if executor.categories.is_empty() {
        return "Ваши категории:\nне выбраны".to_string();
    }
    let lines: Vec<String> = executor.categories.iter().map(|c| escape(c.label())).collect();
    format!("Ваши категории:\n{}", lines.join("\n"))
}

pub fn pro_phone(executor: &Executor) -> String {
    format!("Ваш номер: {}", bold(&executor.phone))
}

/// Dispatcher command list, with the registration link when the pro bot's username is known
pub fn dispatcher_help(registration_link: Option<&str>) -> String {
    let mut text = indoc! {"
        Панель диспетчера.
        Команды:
        /exec_list — список исполнителей
        /exec_approve &lt;id&gt; — одобрить
        /exec_block &lt;id&gt; — заблокировать
        /exec_info &lt;id&gt; — карточка исполнителя
        /orders — последние заявки
        /order_info &lt;id&gt; — заявка и отклики"}
    .to_string();

    if let Some(link) = registration_link {
        text.push_str(&format!("\n\nСсылка для регистрации исполнителей:\n{}", escape(link)));
    }
    text
}

pub fn usage(command: &str) -> String {
    format!("Используйте: /{} {}", command, code("<user_id>"))
}

fn executor_line(executor: &Executor) -> String {
    format!("• {} {} {}", executor.user_id, escape(&executor.name), escape(&executor.phone))
}

fn executor_section(title: &str, executors: &[Executor]) -> String {
    if executors.is_empty() {
        return format!("{}: —", title);
    }
    let lines: Vec<String> = executors.iter().map(executor_line).collect();
    format!("{} ({}):\n{}", title, executors.len(), lines.join("\n"))
}

/// `/exec_list`: pending, approved and blocked sections
pub fn executor_list(grouped: &ExecutorsByStatus) -> String {
    [
        executor_section("Ожидают", &grouped.pending),
        executor_section("Одобренные", &grouped.approved),
        executor_section("Заблокированные", &grouped.blocked),
    ]
    .join("\n\n")
}

pub fn executor_approved(executor: &Executor) -> String {
    format!(
        "Одобрен: {} {} {}",
        executor.user_id,
        escape(&executor.name),
        escape(&executor.phone)
    )
}

pub fn executor_blocked(executor: &Executor) -> String {
    format!(
        "Заблокирован: {} {} {}",
        executor.user_id,
        escape(&executor.name),
        escape(&executor.phone)
    )
}

/// `/exec_info` card
pub fn executor_info(executor: &Executor) -> String {
    format!(
        "{} (id {})\nТел.: {}\nКатегории: {}\nСтатус: {}",
        bold(&executor.name),
        executor.user_id,
        bold(&executor.phone),
        escape(&executor.categories_label()),
        executor.status.label(),
    )
}

/// `/orders`: one line per order, newest first
pub fn orders_list(orders: &[Order]) -> String {
    if orders.is_empty() {
        return NO_ORDERS.to_string();
    }
    let lines: Vec<String> = orders
        .iter()
        .map(|o| {
            format!(
                "#{} [{}] {} — откликов: {}",
                o.id,
                escape(o.category.label()),
                o.date_label(),
                o.responses.len()
            )
        })
        .collect();
    format!("Последние заявки ({}):\n{}", orders.len(), lines.join("\n"))
}

/// `/order_info`: the order plus everyone who responded.
///
/// `responders` holds the registry record for each responding id when it still exists.
pub fn order_info(order: &Order, responders: &[(i64, Option<Executor>)]) -> String {
    let mut text = formatdoc! {"
        {title}
        Категория: {category}
        Дата: {date}
        Адрес: {address}
        Описание: {description}
        Клиент: {phone} (id {customer_id})
        Создана: {created}",
        title = bold(&format!("Заявка #{}", order.id)),
        category = escape(order.category.label()),
        date = order.date_label(),
        address = escape(&order.address),
        description = escape(&order.description),
        phone = bold(&order.customer_phone),
        customer_id = order.customer_id,
        created = order.created_at.format("%d.%m.%Y %H:%M UTC"),
    };

    if responders.is_empty() {
        text.push_str("\n\nОтклики: —");
        return text;
    }

    text.push_str(&format!("\n\nОтклики ({}):", responders.len()));
    for (id, executor) in responders {
        let line = match executor {
            Some(e) => executor_line(e),
            None => format!("• {} (нет в реестре)", id),
        };
        text.push('\n');
        text.push_str(&line);
    }
    text
}
