use clap::{Args, Subcommand, ValueEnum};
use platter::{
    money::Amount,
    restaurants::{MenuItem, Restaurant, RestaurantId},
    search::{Page, SearchQuery, SortBy, SortDirection},
};
use platter_app::{context::AppContext, views::SearchResults};
use rust_decimal::Decimal;

use crate::output::{self, emit, or_dash};

#[derive(Debug, Args)]
pub(crate) struct RestaurantsCommand {
    #[command(subcommand)]
    command: RestaurantsSubcommand,
}

#[derive(Debug, Subcommand)]
enum RestaurantsSubcommand {
    /// Search restaurants
    Search(SearchArgs),

    /// Best rated restaurants
    Top {
        #[arg(long, default_value_t = 6)]
        limit: u32,
    },

    /// Cuisines available to filter by
    Cuisines,

    /// Reviews of one restaurant
    Reviews { id: RestaurantId },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Rating,
    Name,
    Fee,
    Price,
    Time,
}

impl From<SortArg> for SortBy {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Rating => Self::Rating,
            SortArg::Name => Self::Name,
            SortArg::Fee => Self::DeliveryFee,
            SortArg::Price => Self::Price,
            SortArg::Time => Self::AvgDeliveryTime,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Asc => Self::Asc,
            DirectionArg::Desc => Self::Desc,
        }
    }
}

/// Filters shared by restaurant and menu search.
#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Free-text search
    #[arg(long)]
    search: Option<String>,

    /// Cuisine for restaurants, category for menu items
    #[arg(long)]
    category: Option<String>,

    /// Minimum rating
    #[arg(long)]
    min_rating: Option<Decimal>,

    /// Maximum delivery fee for restaurants, maximum price for menu items
    #[arg(long)]
    max_fee: Option<Decimal>,

    /// Sort field
    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Sort direction
    #[arg(long, value_enum, requires = "sort")]
    direction: Option<DirectionArg>,

    /// Zero-based page
    #[arg(long, default_value_t = 0)]
    page: u32,
}

impl SearchArgs {
    /// Apply filters in the order a user would set them, then the page.
    fn apply(&self, query: &mut SearchQuery) {
        if let Some(search) = &self.search {
            query.set_search_term(search);
        }

        if let Some(category) = &self.category {
            query.set_category(category);
        }

        query.set_min_rating(self.min_rating);
        query.set_max_fee(self.max_fee.map(Amount::new));

        if let Some(sort) = self.sort {
            let (_, default_direction) = query.sort();
            let direction = self.direction.map_or(default_direction, SortDirection::from);

            query.set_sort(sort.into(), direction);
        }

        query.set_page(self.page);
    }
}

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    /// Restaurant id
    restaurant: RestaurantId,

    #[command(flatten)]
    filters: SearchArgs,
}

pub(crate) async fn run(command: RestaurantsCommand, context: &AppContext) -> Result<(), String> {
    super::require_login(context)?;

    match command.command {
        RestaurantsSubcommand::Search(args) => search(&args, context).await,
        RestaurantsSubcommand::Top { limit } => {
            let restaurants = context
                .restaurant_browser()
                .top_rated(limit)
                .await
                .map_err(|notice| super::fail(&notice))?;

            emit(&restaurant_table(&restaurants));

            Ok(())
        }
        RestaurantsSubcommand::Cuisines => {
            let cuisines = context.restaurant_browser().cuisines().await;

            emit(&cuisines.join("\n"));

            Ok(())
        }
        RestaurantsSubcommand::Reviews { id } => super::reviews::restaurant(id, context).await,
    }
}

async fn search(args: &SearchArgs, context: &AppContext) -> Result<(), String> {
    let browser = context.restaurant_browser();
    browser.update(|query| args.apply(query));

    let Some(SearchResults { page, notice }) = browser.search().await else {
        return Ok(());
    };

    if let Some(notice) = notice {
        return Err(super::fail(&notice));
    }

    if page.is_empty() {
        emit("No restaurants match these filters.");
        return Ok(());
    }

    emit(&restaurant_table(&page.items));
    emit(&page_footer(&page, browser.query().page()));

    Ok(())
}

pub(crate) async fn menu(args: &MenuArgs, context: &AppContext) -> Result<(), String> {
    super::require_login(context)?;

    let browser = context.menu_browser(args.restaurant);
    let restaurant = browser
        .restaurant()
        .await
        .map_err(|notice| super::fail(&notice))?;

    emit(&format!(
        "{} · {} · delivery {} · minimum order {}",
        restaurant.display_name(),
        or_dash(restaurant.cuisine_type.as_deref()),
        restaurant.delivery_fee,
        restaurant.min_order_amount,
    ));

    browser.update(|query| args.filters.apply(query));

    let Some(SearchResults { page, notice }) = browser.search().await else {
        return Ok(());
    };

    if let Some(notice) = notice {
        return Err(super::fail(&notice));
    }

    if page.is_empty() {
        let categories = browser.categories().await;
        emit(&format!("No menu items found. Categories: {}", categories.join(", ")));
        return Ok(());
    }

    emit(&menu_table(&page.items));
    emit(&page_footer(&page, browser.query().page()));

    Ok(())
}

fn restaurant_table(restaurants: &[Restaurant]) -> String {
    output::table(
        &["Id", "Restaurant", "Cuisine", "Rating", "Delivery fee", "Minimum", "Time"],
        restaurants.iter().map(|restaurant| {
            vec![
                restaurant.id.to_string(),
                restaurant.display_name().to_string(),
                or_dash(restaurant.cuisine_type.as_deref()),
                restaurant
                    .rating
                    .map_or_else(|| "-".to_string(), |rating| format!("★ {rating:.1}")),
                restaurant.delivery_fee.to_string(),
                restaurant.min_order_amount.to_string(),
                restaurant
                    .avg_delivery_time
                    .map_or_else(|| "-".to_string(), |minutes| format!("{minutes} min")),
            ]
        }),
        &[3, 4, 5],
    )
}

fn menu_table(items: &[MenuItem]) -> String {
    output::table(
        &["Id", "Item", "Category", "Diet", "Price", "Available"],
        items.iter().map(|item| {
            let diet = match (item.is_vegan, item.is_vegetarian) {
                (true, _) => "vegan",
                (false, true) => "veg",
                (false, false) => "non-veg",
            };

            vec![
                item.id.to_string(),
                or_dash(item.name.as_deref()),
                or_dash(item.category.as_deref()),
                diet.to_string(),
                item.price.to_string(),
                if item.is_orderable() { "yes" } else { "no" }.to_string(),
            ]
        }),
        &[4],
    )
}

fn page_footer<T>(page: &Page<T>, current: u32) -> String {
    let mut footer = format!(
        "Page {} of {} ({} results)",
        current.saturating_add(1),
        page.total_pages.max(1),
        page.total_elements
    );

    if page.has_next(current) {
        footer.push_str(&format!(" · next: --page {}", current.saturating_add(1)));
    }

    footer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_filters_after_paging_keeps_the_requested_page() {
        let args = SearchArgs {
            search: Some("biryani".to_string()),
            category: None,
            min_rating: None,
            max_fee: None,
            sort: Some(SortArg::Fee),
            direction: None,
            page: 2,
        };

        let mut query = SearchQuery::restaurants();
        args.apply(&mut query);

        assert_eq!(query.page(), 2);
        assert_eq!(query.search_term(), Some("biryani"));
        assert_eq!(query.sort(), (SortBy::DeliveryFee, SortDirection::Desc));
    }

    #[test]
    fn footer_points_at_the_next_page() {
        let page: Page<MenuItem> = Page {
            items: Vec::new(),
            total_pages: 3,
            total_elements: 45,
        };

        assert_eq!(
            page_footer(&page, 0),
            "Page 1 of 3 (45 results) · next: --page 1"
        );
        assert_eq!(page_footer(&page, 2), "Page 3 of 3 (45 results)");
    }
}
