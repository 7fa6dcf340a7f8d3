//! Demo conversations the store is seeded with at startup.

use chrono::{DateTime, Duration, Utc};

use crate::chat::{Chat, ChatMessage, ChatRole};
use crate::ids::{ChatId, MessageId};

/// Static description of one demo conversation.
struct SeedChat {
    id: &'static str,
    title: &'static str,
    /// How long before "now" the chat was last updated.
    age_hours: i64,
    messages: &'static [(&'static str, ChatRole, &'static str)],
}

const SEED_CHATS: &[SeedChat] = &[
    SeedChat {
        id: "chat-1",
        title: "Help me write a Python web scraper",
        age_hours: 2,
        messages: &[
            ("msg-1a", ChatRole::User, "Can you help me write a Python web scraper that extracts product prices from an e-commerce site?"),
            ("msg-1b", ChatRole::Assistant, "I'd be happy to help you build a web scraper! Here's a clean approach using `requests` and `BeautifulSoup`:\n\n```python\nimport requests\nfrom bs4 import BeautifulSoup\n\ndef scrape_prices(url):\n    response = requests.get(url, headers={'User-Agent': 'Mozilla/5.0'})\n    soup = BeautifulSoup(response.text, 'html.parser')\n    \n    prices = []\n    for item in soup.select('.product-card'):\n        name = item.select_one('.product-name').text.strip()\n        price = item.select_one('.price').text.strip()\n        prices.append({'name': name, 'price': price})\n    \n    return prices\n```\n\nA few important considerations:\n\n1. **Respect robots.txt** — always check the site's scraping policy\n2. **Add delays** — use `time.sleep()` between requests to avoid overwhelming the server\n3. **Handle errors gracefully** — network requests can fail for many reasons\n\nWant me to add pagination support or error handling?"),
            ("msg-1c", ChatRole::User, "Yes, please add pagination and error handling!"),
            ("msg-1d", ChatRole::Assistant, "Here's the enhanced version with pagination and robust error handling:\n\n```python\nimport requests\nfrom bs4 import BeautifulSoup\nimport time\nimport logging\n\nlogging.basicConfig(level=logging.INFO)\nlogger = logging.getLogger(__name__)\n\ndef scrape_prices(base_url, max_pages=10):\n    all_prices = []\n    \n    for page in range(1, max_pages + 1):\n        try:\n            url = f'{base_url}?page={page}'\n            logger.info(f'Scraping page {page}...')\n            \n            response = requests.get(\n                url,\n                headers={'User-Agent': 'Mozilla/5.0'},\n                timeout=10\n            )\n            response.raise_for_status()\n            \n            soup = BeautifulSoup(response.text, 'html.parser')\n            items = soup.select('.product-card')\n            \n            if not items:\n                logger.info('No more products found')\n                break\n            \n            for item in items:\n                name = item.select_one('.product-name')\n                price = item.select_one('.price')\n                if name and price:\n                    all_prices.append({\n                        'name': name.text.strip(),\n                        'price': price.text.strip()\n                    })\n            \n            time.sleep(1.5)  # Be polite\n            \n        except requests.RequestException as e:\n            logger.error(f'Error on page {page}: {e}')\n            continue\n    \n    return all_prices\n```\n\nThis version handles network timeouts, HTTP errors, missing elements, and includes polite delays between requests."),
        ],
    },
    SeedChat {
        id: "chat-2",
        title: "Explain quantum computing basics",
        age_hours: 5,
        messages: &[
            ("msg-2a", ChatRole::User, "I'm a software engineer trying to understand quantum computing. Can you explain the basics in terms I'd relate to?"),
            ("msg-2b", ChatRole::Assistant, "Great question! Let me bridge quantum computing to concepts you already know.\n\n**Classical bits vs Qubits**\n\nYou know bits — they're 0 or 1. Think of a light switch. A qubit is more like a **dimmer switch** — it can be 0, 1, or any combination of both simultaneously. This is called **superposition**.\n\n**Superposition = Parallel Processing on Steroids**\n\nImagine you're searching a maze. A classical computer tries one path at a time. A quantum computer explores *all paths simultaneously*. With 3 classical bits you can represent one of 8 states. With 3 qubits, you represent all 8 states at once.\n\n**Entanglement = Spooky Linked Variables**\n\nThink of two entangled qubits like two magic dice — no matter how far apart, when you roll one and get a 6, the other *instantly* shows 1. They're correlated in ways that let quantum algorithms coordinate computations impossibly fast.\n\n**Where It Matters**\n\n- **Cryptography** — Shor's algorithm could break RSA\n- **Optimization** — finding the best solution among millions\n- **Simulation** — modeling molecules for drug discovery\n\nIt won't replace your laptop for everyday coding, but for specific problem classes, it's a game-changer."),
        ],
    },
    SeedChat {
        id: "chat-3",
        title: "Debug my React useEffect loop",
        age_hours: 27,
        messages: &[
            ("msg-3a", ChatRole::User, "My React component keeps re-rendering infinitely. I think it's a useEffect issue but I can't figure it out."),
            ("msg-3b", ChatRole::Assistant, "Infinite re-render loops with `useEffect` are one of the most common React pitfalls. Here are the usual suspects:\n\n**1. Missing or wrong dependency array**\n```jsx\n// Bad — runs every render\nuseEffect(() => {\n  setData(transform(props.items))\n})\n\n// Good — runs when items change\nuseEffect(() => {\n  setData(transform(props.items))\n}, [props.items])\n```\n\n**2. Object/array in dependencies**\n```jsx\n// Bad — new object reference every render\nuseEffect(() => {\n  fetchData(filters)\n}, [filters]) // if filters = { page: 1 } created inline\n\n// Good — memoize the object\nconst filters = useMemo(() => ({ page }), [page])\n```\n\n**3. Setting state that triggers the effect**\n```jsx\n// Bad — infinite loop\nuseEffect(() => {\n  setCount(count + 1) // triggers re-render, triggers effect...\n}, [count])\n```\n\nCould you share your component code? I can pinpoint the exact issue."),
        ],
    },
    SeedChat {
        id: "chat-4",
        title: "Design a REST API for a todo app",
        age_hours: 32,
        messages: &[
            ("msg-4a", ChatRole::User, "What would a well-designed REST API look like for a todo application?"),
            ("msg-4b", ChatRole::Assistant, "Here's a clean REST API design for a todo app following best practices:\n\n**Endpoints**\n\n| Method | Path | Description |\n|--------|------|-------------|\n| `GET` | `/api/todos` | List all todos |\n| `POST` | `/api/todos` | Create a todo |\n| `GET` | `/api/todos/:id` | Get a specific todo |\n| `PATCH` | `/api/todos/:id` | Update a todo |\n| `DELETE` | `/api/todos/:id` | Delete a todo |\n\n**Query Parameters for GET /api/todos**\n- `?status=completed` — filter by status\n- `?sort=createdAt&order=desc` — sorting\n- `?page=1&limit=20` — pagination\n\n**Response Format**\n```json\n{\n  \"data\": [{\n    \"id\": \"uuid\",\n    \"title\": \"Buy groceries\",\n    \"completed\": false,\n    \"createdAt\": \"2024-01-15T10:30:00Z\"\n  }],\n  \"meta\": {\n    \"total\": 42,\n    \"page\": 1,\n    \"limit\": 20\n  }\n}\n```\n\nKey principles: use **plural nouns** for resources, **HTTP methods** for actions, proper **status codes**, and consistent **response envelopes**."),
        ],
    },
    SeedChat {
        id: "chat-5",
        title: "Compare TypeScript vs JavaScript for large projects",
        age_hours: 72,
        messages: &[
            ("msg-5a", ChatRole::User, "Should I use TypeScript for my next large project? What are the real tradeoffs?"),
            ("msg-5b", ChatRole::Assistant, "For large projects, TypeScript is almost always worth it. Here's an honest assessment:\n\n**Why TypeScript wins at scale:**\n- Catches entire categories of bugs at compile time\n- Self-documenting code through types\n- Incredible IDE support (autocomplete, refactoring)\n- Safer refactoring across large codebases\n- Better team collaboration — types are contracts\n\n**The real costs:**\n- Initial setup and learning curve\n- Slower compilation (mitigated by incremental builds)\n- Some libraries have poor type definitions\n- Can lead to over-engineering with complex generics\n\n**My recommendation:** Use TypeScript with a pragmatic approach. Start with `strict: true` but don't be afraid of `any` as an escape hatch during prototyping. The investment pays off exponentially as the codebase grows past ~10k lines."),
        ],
    },
    SeedChat {
        id: "chat-6",
        title: "Best practices for Docker in production",
        age_hours: 120,
        messages: &[
            ("msg-6a", ChatRole::User, "What are the essential Docker best practices for production deployments?"),
            ("msg-6b", ChatRole::Assistant, "Here are the production Docker practices that actually matter:\n\n**1. Use multi-stage builds**\n```dockerfile\nFROM node:20-alpine AS builder\nWORKDIR /app\nCOPY package*.json ./\nRUN npm ci\nCOPY . .\nRUN npm run build\n\nFROM node:20-alpine\nWORKDIR /app\nCOPY --from=builder /app/dist ./dist\nCOPY --from=builder /app/node_modules ./node_modules\nCMD [\"node\", \"dist/main.js\"]\n```\n\n**2. Never run as root** — add `USER node`\n\n**3. Use `.dockerignore`** — keep images lean\n\n**4. Pin versions** — `node:20.11-alpine`, not `node:latest`\n\n**5. Health checks** — `HEALTHCHECK CMD curl -f http://localhost:3000/health`\n\n**6. One process per container** — don't run nginx + node in one container\n\n**7. Use secrets management** — never bake credentials into images"),
        ],
    },
    SeedChat {
        id: "chat-7",
        title: "SQL query optimization tips",
        age_hours: 288,
        messages: &[
            ("msg-7a", ChatRole::User, "My database queries are getting slow as the data grows. Any optimization tips?"),
            ("msg-7b", ChatRole::Assistant, "Slow queries are usually caused by a handful of common issues. Let's tackle them:\n\n**1. Index your WHERE clauses**\n```sql\n-- If you query by email often:\nCREATE INDEX idx_users_email ON users(email);\n```\n\n**2. Avoid SELECT ***\n```sql\n-- Bad\nSELECT * FROM orders WHERE user_id = 123;\n\n-- Good\nSELECT id, total, created_at FROM orders WHERE user_id = 123;\n```\n\n**3. Use EXPLAIN ANALYZE** — always check your query plan before optimizing blindly.\n\n**4. Pagination with cursors, not OFFSET**\n```sql\n-- Slow at high offsets\nSELECT * FROM products LIMIT 20 OFFSET 10000;\n\n-- Fast always\nSELECT * FROM products WHERE id > 10000 LIMIT 20;\n```\n\n**5. Denormalize hot paths** — sometimes a little redundancy saves expensive JOINs.\n\nWhat's your database engine and rough table sizes?"),
        ],
    },
    SeedChat {
        id: "chat-8",
        title: "Learning Rust as a JS developer",
        age_hours: 840,
        messages: &[
            ("msg-8a", ChatRole::User, "I'm a JavaScript developer interested in learning Rust. Where should I start?"),
            ("msg-8b", ChatRole::Assistant, "Welcome to the Rust journey! As a JS dev, you'll find some concepts familiar and others completely new. Here's your roadmap:\n\n**Week 1-2: Foundations**\n- Read chapters 1-6 of *The Rust Book* (free online)\n- Key concepts: ownership, borrowing, lifetimes — this is the big mental shift\n- Think of ownership like JS's garbage collection, but explicit\n\n**Week 3-4: Getting Practical**\n- Build a CLI tool (file processor, API client)\n- Rust's `clap` crate is like `commander.js`\n- `serde` for JSON is like JS's built-in `JSON.parse`\n\n**Concepts that'll trip you up:**\n- No `null` — Rust uses `Option<T>` instead\n- No exceptions — Rust uses `Result<T, E>`\n- No garbage collector — you manage memory through ownership\n- Strings are complex — `String` vs `&str` takes getting used to\n\n**What'll feel familiar:**\n- Pattern matching (like destructuring on steroids)\n- Iterators and closures\n- Package manager (Cargo ≈ npm)\n- Strong module system\n\nThe learning curve is steep for about 2-3 weeks, then it clicks."),
        ],
    },
];

/// Build the demo conversations with timestamps relative to `now`.
///
/// Chats come back newest first, matching store order.
pub fn seed_chats(now: DateTime<Utc>) -> Vec<Chat> {
    SEED_CHATS
        .iter()
        .map(|seed| {
            let at = now - Duration::hours(seed.age_hours);
            let mut chat = Chat::new(seed.title, at).with_id(ChatId::new(seed.id));
            chat.messages = seed
                .messages
                .iter()
                .map(|(id, role, text)| ChatMessage::new(*role, *text).with_id(MessageId::new(*id)))
                .collect();
            chat
        })
        .collect()
}
